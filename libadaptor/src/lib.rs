pub mod adaptor_signature;
pub mod backend;
pub mod codec;
pub mod engine;
pub mod error;
pub mod hashes;
pub mod helpers;
pub mod keys;
pub mod nonce;

pub use adaptor_signature::{ExtractedAdaptor, PointRelation, PreSignature, Signature};
pub use backend::{CurveBackend, Secp256k1};
pub use engine::AdaptorEngine;
pub use error::{AdaptorError, DecodeError, ReadError};
pub use keys::{AdaptorPoint, AdaptorSecret, SigningKey, XOnlyPoint};

/// The BIP-340 adaptor engine over secp256k1.
pub type Bip340AdaptorEngine = AdaptorEngine<Secp256k1, hashes::Bip340Challenge>;
