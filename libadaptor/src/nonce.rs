//! Deterministic nonce derivation for adaptor pre-signatures.
//!
//! The nonce is a hash of the signing key, the public key, the adaptor point and the message. Including the adaptor
//! point is essential: pre-signing the same message under two different adaptor points with one nonce would let the
//! counterparty solve for the private key.

use crate::backend::CurveBackend;
use crate::error::AdaptorError;
use crate::hashes::{tagged_hash, AUX_TAG, NONCE_TAG};
use crate::keys::{SigningKey, XOnlyPoint};
use log::trace;
use zeroize::Zeroizing;

/// A secret nonce scalar $r$ and its public point $R = r\cdot G$, where $R$ always has an even y-coordinate.
pub struct Nonce<B: CurveBackend> {
    secret: Zeroizing<B::Scalar>,
    point: B::Point,
}

impl<B: CurveBackend> Nonce<B> {
    pub fn as_scalar(&self) -> &B::Scalar {
        &self.secret
    }

    /// The full, even-y nonce point.
    pub fn point(&self) -> &B::Point {
        &self.point
    }

    pub fn public_nonce(&self) -> XOnlyPoint {
        XOnlyPoint::from_point::<B>(&self.point)
    }
}

/// Derive the nonce for pre-signing `msg` under `adaptor`.
///
/// With `aux = None` the result depends only on the inputs. When `aux` is given, the key bytes are masked with
/// `tagged_hash(AUX_TAG, aux)` first, as BIP-340 does for its signing nonces.
pub fn derive_nonce<B: CurveBackend>(
    key: &SigningKey<B>,
    msg: &[u8; 32],
    adaptor: &XOnlyPoint,
    aux: Option<&[u8; 32]>,
) -> Result<Nonce<B>, AdaptorError> {
    let mut key_bytes = key.to_bytes();
    if let Some(aux) = aux {
        let mask = tagged_hash(AUX_TAG, &[&aux[..]]);
        key_bytes.iter_mut().zip(mask.iter()).for_each(|(k, m)| *k ^= m);
    }
    let digest = Zeroizing::new(tagged_hash(
        NONCE_TAG,
        &[&key_bytes[..], &key.public_key().as_bytes()[..], &adaptor.as_bytes()[..], &msg[..]],
    ));
    let r = Zeroizing::new(B::scalar_reduce(&digest));
    if B::scalar_is_zero(&r) {
        return Err(AdaptorError::invalid_input("derived nonce is zero"));
    }
    let point = B::generator_mul(&r);
    if B::has_even_y(&point) {
        Ok(Nonce { secret: r, point })
    } else {
        trace!("Nonce point has odd y. Negating the nonce.");
        Ok(Nonce { secret: Zeroizing::new(B::scalar_neg(&r)), point: B::negate(&point) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Secp256k1;
    use crate::keys::AdaptorSecret;

    const KEY: &str = "b7e151628aed2a6abf7158809cf4f3c762e7160f38b4da56a784d9045190cfef";
    const MSG: &str = "243f6a8885a308d313198a2e03707344a4093822299f31d0082efa98ec4e6c89";
    const FIVE_G_X: &str = "2f8bde4d1a07209355b4a7250a5c5128e88b84bddc619ab7cba8d569b240efe4";

    fn fixtures() -> (SigningKey<Secp256k1>, [u8; 32], XOnlyPoint) {
        let key = SigningKey::from_hex(KEY).unwrap();
        let mut msg = [0u8; 32];
        hex::decode_to_slice(MSG, &mut msg).unwrap();
        let t = XOnlyPoint::from_hex::<Secp256k1>(FIVE_G_X).unwrap();
        (key, msg, t)
    }

    #[test]
    fn nonce_is_deterministic() {
        let (key, msg, t) = fixtures();
        let a = derive_nonce(&key, &msg, &t, None).unwrap();
        let b = derive_nonce(&key, &msg, &t, None).unwrap();
        assert_eq!(a.as_scalar(), b.as_scalar());
        assert_eq!(a.public_nonce().as_hex(), "4eb504ddc09ffc0ecd25553c0dbc981eb47283d7bebbdd497f81da8eab987ec6");
    }

    #[test]
    fn nonce_point_is_even_and_matches_scalar() {
        let (key, msg, _) = fixtures();
        let mut rng = rand::rng();
        for _ in 0..16 {
            let t = AdaptorSecret::<Secp256k1>::random(&mut rng).point().to_x_only();
            let nonce = derive_nonce(&key, &msg, &t, None).unwrap();
            assert!(Secp256k1::has_even_y(nonce.point()));
            assert_eq!(Secp256k1::generator_mul(nonce.as_scalar()), *nonce.point());
        }
    }

    #[test]
    fn nonce_depends_on_adaptor_point() {
        let (key, msg, t) = fixtures();
        let other = AdaptorSecret::<Secp256k1>::random(&mut rand::rng()).point().to_x_only();
        let a = derive_nonce(&key, &msg, &t, None).unwrap();
        let b = derive_nonce(&key, &msg, &other, None).unwrap();
        assert_ne!(a.public_nonce(), b.public_nonce());
    }

    #[test]
    fn aux_randomness_changes_nonce() {
        let (key, msg, t) = fixtures();
        let plain = derive_nonce(&key, &msg, &t, None).unwrap();
        let zero_aux = derive_nonce(&key, &msg, &t, Some(&[0u8; 32])).unwrap();
        let other_aux = derive_nonce(&key, &msg, &t, Some(&[1u8; 32])).unwrap();
        assert_ne!(plain.public_nonce(), zero_aux.public_nonce());
        assert_ne!(zero_aux.public_nonce(), other_aux.public_nonce());
        let again = derive_nonce(&key, &msg, &t, Some(&[1u8; 32])).unwrap();
        assert_eq!(other_aux.public_nonce(), again.public_nonce());
    }
}
