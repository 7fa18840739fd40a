use hex::FromHexError;
use thiserror::Error;

/// Malformed point or scalar bytes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("invalid length for {field}: expected {expected} bytes, got {actual}")]
    InvalidLength { field: &'static str, expected: usize, actual: usize },
    #[error("x-coordinate does not correspond to a point on the curve")]
    NotOnCurve,
    #[error("invalid point encoding")]
    InvalidPointEncoding,
    #[error("the point at infinity is not a valid point here")]
    PointAtInfinity,
    #[error("scalar is not below the group order")]
    ScalarOutOfRange,
    #[error("scalar must be non-zero")]
    ZeroScalar,
    #[error("Could not deserialize from hex: {0}")]
    Hex(#[from] FromHexError),
}

impl DecodeError {
    pub fn invalid_length(field: &'static str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength { field, expected, actual }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdaptorError {
    #[error("Decoding error: {0}")]
    Decode(#[from] DecodeError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The pre-signature and signature were not produced over the same nonce, adaptor point, key and message.
    #[error("The signature is not an adaptation of the given pre-signature")]
    IncompatibleSignature,
    #[error("The adaptor point does not match the pre-signature's adaptor point")]
    AdaptorMismatch,
}

impl AdaptorError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
}

#[derive(Debug, Error)]
#[error("error reading field '{field}': {error}")]
pub struct ReadError {
    field: String,
    error: String,
}

impl ReadError {
    pub fn new(field: impl Into<String>, error: impl Into<String>) -> Self {
        Self { field: field.into(), error: error.into() }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}
