//! The adaptor protocol engine: PreSign, PreVerify, Adapt and ExtractAdaptor over BIP-340 Schnorr signatures.
//!
//! Notation:
//! * $R$ is the even-y nonce point carried in the pre-signature, $T$ the adaptor point, $P$ the public key.
//! * $R_T = \text{lift}(R) + \text{lift}(T)$. Its x-coordinate is the nonce of the final signature and is what the
//!   challenge $e = H(x(R_T) \| P \| m)$ commits to.
//! * BIP-340 requires the final nonce point to have even y. When $R_T$ has odd y, the final signature is over
//!   $-R_T$, so the pre-signer uses $-r$ and the adapter adds $-t$.

use crate::adaptor_signature::{ExtractedAdaptor, PointRelation, PreSignature, Signature};
use crate::backend::CurveBackend;
use crate::error::AdaptorError;
use crate::hashes::{Bip340Challenge, ChallengeHasher};
use crate::helpers::message_digest;
use crate::keys::{AdaptorSecret, SigningKey, XOnlyPoint};
use crate::nonce::derive_nonce;
use log::*;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use zeroize::Zeroizing;

/// Stateless adaptor signature engine, generic over the curve arithmetic backend `B` and the challenge hash `H`.
pub struct AdaptorEngine<B: CurveBackend, H: ChallengeHasher = Bip340Challenge> {
    _marker: PhantomData<fn() -> (B, H)>,
}

impl<B: CurveBackend, H: ChallengeHasher> AdaptorEngine<B, H> {
    pub const fn new() -> Self {
        Self { _marker: PhantomData }
    }

    /// Produce a pre-signature over `msg` that only becomes a valid BIP-340 signature once the discrete log of
    /// `adaptor` is added to it.
    ///
    /// The nonce is derived deterministically from the key, message and adaptor point, so calling this twice with the
    /// same inputs yields the same pre-signature.
    pub fn pre_sign(
        &self,
        key: &SigningKey<B>,
        msg: &[u8],
        adaptor: &XOnlyPoint,
    ) -> Result<PreSignature<B>, AdaptorError> {
        self.pre_sign_inner(key, msg, adaptor, None)
    }

    /// As [`AdaptorEngine::pre_sign`], but masks the key with auxiliary randomness during nonce derivation.
    pub fn pre_sign_with_aux(
        &self,
        key: &SigningKey<B>,
        msg: &[u8],
        adaptor: &XOnlyPoint,
        aux: &[u8; 32],
    ) -> Result<PreSignature<B>, AdaptorError> {
        self.pre_sign_inner(key, msg, adaptor, Some(aux))
    }

    fn pre_sign_inner(
        &self,
        key: &SigningKey<B>,
        msg: &[u8],
        adaptor: &XOnlyPoint,
        aux: Option<&[u8; 32]>,
    ) -> Result<PreSignature<B>, AdaptorError> {
        let msg = message_digest(msg)?;
        let nonce = derive_nonce(key, &msg, adaptor, aux)?;
        let sum = Self::nonce_sum(nonce.point(), adaptor)?;
        let e = Self::challenge(&B::x_only(&sum), key.public_key(), &msg);
        let k = if B::has_even_y(&sum) {
            Zeroizing::new(*nonce.as_scalar())
        } else {
            trace!("R + T has odd y. Signing with the negated nonce.");
            Zeroizing::new(B::scalar_neg(nonce.as_scalar()))
        };
        let ep = Zeroizing::new(B::scalar_mul(&e, key.as_scalar()));
        let s = B::scalar_add(&k, &ep);
        if B::scalar_is_zero(&s) {
            return Err(AdaptorError::invalid_input("pre-signature scalar is zero"));
        }
        Ok(PreSignature::new(nonce.public_nonce(), s, *adaptor))
    }

    /// Check that `pre_sig` is a valid pre-signature by `pubkey` over `msg` for its adaptor point.
    ///
    /// Never fails: undecodable points and wrong-length messages simply produce `false`.
    pub fn pre_verify(&self, pre_sig: &PreSignature<B>, pubkey: &XOnlyPoint, msg: &[u8]) -> bool {
        match Self::check_pre_signature(pre_sig, pubkey, msg) {
            Ok(true) => {
                debug!("Pre-signature verified for public key {pubkey}");
                true
            }
            Ok(false) => {
                warn!("Pre-signature did not verify for public key {pubkey}");
                false
            }
            Err(e) => {
                warn!("Could not verify pre-signature: {e}");
                false
            }
        }
    }

    /// Decode a 96-byte pre-signature and a 32-byte x-only public key, then run [`AdaptorEngine::pre_verify`].
    /// Suitable for untrusted network input.
    pub fn pre_verify_bytes(&self, pre_sig: &[u8], pubkey: &[u8], msg: &[u8]) -> bool {
        let pre_sig = match PreSignature::<B>::from_bytes(pre_sig) {
            Ok(p) => p,
            Err(e) => {
                warn!("Rejecting malformed pre-signature: {e}");
                return false;
            }
        };
        let pubkey = match XOnlyPoint::from_slice::<B>(pubkey) {
            Ok(p) => p,
            Err(e) => {
                warn!("Rejecting malformed public key: {e}");
                return false;
            }
        };
        self.pre_verify(&pre_sig, &pubkey, msg)
    }

    #[allow(non_snake_case)]
    fn check_pre_signature(pre_sig: &PreSignature<B>, pubkey: &XOnlyPoint, msg: &[u8]) -> Result<bool, AdaptorError> {
        let msg = message_digest(msg)?;
        let R = pre_sig.nonce_point().lift::<B>()?;
        let P = pubkey.lift::<B>()?;
        let R_T = Self::nonce_sum(&R, pre_sig.adaptor_point())?;
        let e = Self::challenge(&B::x_only(&R_T), pubkey, &msg);
        let R = if B::has_even_y(&R_T) { R } else { B::negate(&R) };
        let lhs = B::generator_mul(pre_sig.s());
        let rhs = B::add(&R, &B::mul(&P, &e));
        Ok(lhs == rhs)
    }

    /// Complete a pre-signature into a BIP-340 signature using the adaptor secret.
    ///
    /// `secret` may be the discrete log of either $T$ or $-T$. The result is not checked: a wrong secret produces a
    /// well-formed signature that fails verification. The only errors are undecodable points in `pre_sig`.
    #[allow(non_snake_case)]
    pub fn adapt(&self, pre_sig: &PreSignature<B>, secret: &AdaptorSecret<B>) -> Result<Signature<B>, AdaptorError> {
        let R = pre_sig.nonce_point().lift::<B>()?;
        let T = pre_sig.adaptor_point().lift::<B>()?;
        let R_T = Self::nonce_sum(&R, pre_sig.adaptor_point())?;
        let offset = Self::adaptor_offset(secret.as_scalar(), &T, B::has_even_y(&R_T));
        let s = B::scalar_add(pre_sig.s(), &offset);
        Ok(Signature::new(XOnlyPoint::from_point::<B>(&R_T), s))
    }

    /// Recover the adaptor secret from a pre-signature and the signature adapted from it.
    ///
    /// Both $s'' - s'$ and its negation are tried. A candidate $c$ is accepted only if $c\cdot G$ is one of the two
    /// points with the pre-signature's adaptor x-coordinate and adapting with $c$ reproduces $s''$ exactly. The
    /// returned [`ExtractedAdaptor`] reports which of the two points $c\cdot G$ is.
    #[allow(non_snake_case)]
    pub fn extract_adaptor(
        &self,
        pre_sig: &PreSignature<B>,
        sig: &Signature<B>,
    ) -> Result<ExtractedAdaptor<B>, AdaptorError> {
        let R = pre_sig.nonce_point().lift::<B>()?;
        let T = pre_sig.adaptor_point().lift::<B>()?;
        let R_T = Self::nonce_sum(&R, pre_sig.adaptor_point())?;
        if XOnlyPoint::from_point::<B>(&R_T) != *sig.nonce_point() {
            warn!("Signature nonce {} is not R + T for this pre-signature", sig.nonce_point());
            return Err(AdaptorError::IncompatibleSignature);
        }
        let sum_even = B::has_even_y(&R_T);
        let neg_T = B::negate(&T);
        let c1 = Zeroizing::new(B::scalar_sub(sig.s(), pre_sig.s()));
        let c2 = Zeroizing::new(B::scalar_neg(&c1));
        for candidate in [c1, c2] {
            if B::scalar_is_zero(&candidate) {
                continue;
            }
            let point = B::generator_mul(&candidate);
            let relation = if point == T {
                PointRelation::EvenLift
            } else if point == neg_T {
                PointRelation::NegatedLift
            } else {
                continue;
            };
            let offset = Self::adaptor_offset(&candidate, &T, sum_even);
            if B::scalar_add(pre_sig.s(), &offset) == *sig.s() {
                debug!("Extracted adaptor secret for {} ({relation:?})", pre_sig.adaptor_point());
                let secret = AdaptorSecret::new(candidate)?;
                return Ok(ExtractedAdaptor::new(secret, relation, *pre_sig.adaptor_point()));
            }
            trace!("Adaptor candidate ({relation:?}) does not reproduce the signature scalar");
        }
        warn!("No adaptor candidate for {} reproduces the signature", pre_sig.adaptor_point());
        Err(AdaptorError::IncompatibleSignature)
    }

    /// Standard BIP-340 verification of `sig` by `pubkey` over `msg`.
    pub fn verify(&self, sig: &Signature<B>, pubkey: &XOnlyPoint, msg: &[u8]) -> bool {
        match Self::check_signature(sig, pubkey, msg) {
            Ok(valid) => {
                if !valid {
                    debug!("Signature did not verify for public key {pubkey}");
                }
                valid
            }
            Err(e) => {
                warn!("Could not verify signature: {e}");
                false
            }
        }
    }

    #[allow(non_snake_case)]
    fn check_signature(sig: &Signature<B>, pubkey: &XOnlyPoint, msg: &[u8]) -> Result<bool, AdaptorError> {
        let msg = message_digest(msg)?;
        let P = pubkey.lift::<B>()?;
        let e = Self::challenge(sig.nonce_point().as_bytes(), pubkey, &msg);
        let R = B::add(&B::generator_mul(sig.s()), &B::negate(&B::mul(&P, &e)));
        if B::is_identity(&R) || !B::has_even_y(&R) {
            return Ok(false);
        }
        Ok(B::x_only(&R) == *sig.nonce_point().as_bytes())
    }

    fn challenge(r_x: &[u8; 32], pubkey: &XOnlyPoint, msg: &[u8; 32]) -> B::Scalar {
        let mut hasher = H::default();
        B::scalar_reduce(&hasher.challenge(r_x, pubkey.as_bytes(), msg))
    }

    /// $\text{lift}(R) + \text{lift}(T)$, given the already lifted nonce point.
    fn nonce_sum(nonce: &B::Point, adaptor: &XOnlyPoint) -> Result<B::Point, AdaptorError> {
        let sum = B::add(nonce, &adaptor.lift::<B>()?);
        if B::is_identity(&sum) {
            return Err(AdaptorError::invalid_input("nonce and adaptor points sum to infinity"));
        }
        Ok(sum)
    }

    /// The scalar added to $s'$ when adapting with `secret`: first bring `secret` to the discrete log of the even-y
    /// lift of $T$, then negate it if $R_T$ has odd y.
    fn adaptor_offset(secret: &B::Scalar, lifted_t: &B::Point, sum_even: bool) -> Zeroizing<B::Scalar> {
        let t_lift = if B::generator_mul(secret) == *lifted_t {
            Zeroizing::new(*secret)
        } else {
            Zeroizing::new(B::scalar_neg(secret))
        };
        if sum_even {
            t_lift
        } else {
            Zeroizing::new(B::scalar_neg(&t_lift))
        }
    }
}

impl<B: CurveBackend, H: ChallengeHasher> Default for AdaptorEngine<B, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: CurveBackend, H: ChallengeHasher> Clone for AdaptorEngine<B, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: CurveBackend, H: ChallengeHasher> Copy for AdaptorEngine<B, H> {}

impl<B: CurveBackend, H: ChallengeHasher> Debug for AdaptorEngine<B, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AdaptorEngine<{}>", B::NAME)
    }
}
