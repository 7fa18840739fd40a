//! Curve arithmetic backends
//!
//! The adaptor protocol only needs a small set of group and scalar operations on secp256k1. [`CurveBackend`]
//! captures exactly that set so that the protocol code in [`crate::engine`] never touches a concrete curve library.
//! Alternate implementations (hardware-backed, constant-time audited, etc.) can be dropped in by implementing the
//! trait and instantiating [`crate::AdaptorEngine`] with them.
//!
//! All functions are associated functions; a backend carries no state.

mod k256_impl;

pub use k256_impl::Secp256k1;

use crate::error::DecodeError;
use std::fmt::Debug;
use zeroize::Zeroize;

/// Length of a big-endian scalar or an x-only point.
pub const SCALAR_LEN: usize = 32;
/// Length of a SEC1 compressed point.
pub const COMPRESSED_POINT_LEN: usize = 33;

pub trait CurveBackend: Clone + Copy + Debug + Default + PartialEq + Eq + Send + Sync + 'static {
    /// An integer modulo the group order n.
    type Scalar: Copy + Eq + Debug + Zeroize + Send + Sync;
    /// A full (two-coordinate) curve point, including the point at infinity.
    type Point: Copy + Eq + Debug + Send + Sync;

    const NAME: &'static str;

    /// $k\cdot G$
    fn generator_mul(k: &Self::Scalar) -> Self::Point;

    /// $k\cdot P$
    fn mul(p: &Self::Point, k: &Self::Scalar) -> Self::Point;

    fn add(p: &Self::Point, q: &Self::Point) -> Self::Point;

    fn negate(p: &Self::Point) -> Self::Point;

    fn is_identity(p: &Self::Point) -> bool;

    /// Whether the affine y-coordinate of `p` is even. Undefined for the point at infinity.
    fn has_even_y(p: &Self::Point) -> bool;

    /// Recover the point with x-coordinate `x` and even y.
    fn lift_x(x: &[u8; SCALAR_LEN]) -> Result<Self::Point, DecodeError>;

    /// The 32-byte x-coordinate of `p`. The caller must ensure `p` is not the identity.
    fn x_only(p: &Self::Point) -> [u8; SCALAR_LEN];

    /// Decode a 33-byte SEC1 compressed point. The point at infinity is rejected.
    fn decode_point(bytes: &[u8; COMPRESSED_POINT_LEN]) -> Result<Self::Point, DecodeError>;

    fn encode_point(p: &Self::Point) -> [u8; COMPRESSED_POINT_LEN];

    /// Interpret big-endian bytes as a scalar, rejecting values $\geq n$. Zero is accepted.
    fn scalar_from_bytes(bytes: &[u8; SCALAR_LEN]) -> Result<Self::Scalar, DecodeError>;

    /// Interpret big-endian bytes as an integer and reduce it modulo n.
    fn scalar_reduce(bytes: &[u8; SCALAR_LEN]) -> Self::Scalar;

    fn scalar_to_bytes(s: &Self::Scalar) -> [u8; SCALAR_LEN];

    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    fn scalar_sub(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    fn scalar_mul(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    fn scalar_neg(a: &Self::Scalar) -> Self::Scalar;

    fn scalar_is_zero(a: &Self::Scalar) -> bool;

    /// Decode a scalar that must lie in $[1, n)$.
    fn nonzero_scalar_from_bytes(bytes: &[u8; SCALAR_LEN]) -> Result<Self::Scalar, DecodeError> {
        let s = Self::scalar_from_bytes(bytes)?;
        if Self::scalar_is_zero(&s) {
            return Err(DecodeError::ZeroScalar);
        }
        Ok(s)
    }
}
