use sha2::{Digest, Sha256};

/// BIP-340 challenge tag. Must match exactly for adapted signatures to verify under unmodified BIP-340 verifiers.
pub const CHALLENGE_TAG: &[u8] = b"BIP0340/challenge";
/// Tag for deterministic adaptor pre-signature nonces.
pub const NONCE_TAG: &[u8] = b"BIP340Adaptor/nonce";
/// Tag used to mask the signing key with auxiliary randomness before nonce derivation.
pub const AUX_TAG: &[u8] = b"BIP340Adaptor/aux";

/// BIP-340 tagged hash: `SHA256(SHA256(tag) || SHA256(tag) || data)`.
pub fn tagged_hash(tag: &[u8], chunks: &[&[u8]]) -> [u8; 32] {
    let tag_hash = Sha256::digest(tag);
    let mut hasher = Sha256::new();
    hasher.update(tag_hash);
    hasher.update(tag_hash);
    for chunk in chunks {
        hasher.update(chunk);
    }
    hasher.finalize().into()
}

/// Produces the Schnorr challenge digest over `(R.x, P.x, m)`. Reduction modulo the group order is left to the
/// curve backend.
pub trait ChallengeHasher: Default {
    fn challenge(&mut self, r_x: &[u8; 32], p_x: &[u8; 32], msg: &[u8; 32]) -> [u8; 32];
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Bip340Challenge;

impl ChallengeHasher for Bip340Challenge {
    fn challenge(&mut self, r_x: &[u8; 32], p_x: &[u8; 32], msg: &[u8; 32]) -> [u8; 32] {
        tagged_hash(CHALLENGE_TAG, &[&r_x[..], &p_x[..], &msg[..]])
    }
}
