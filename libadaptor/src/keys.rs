use crate::backend::{CurveBackend, COMPRESSED_POINT_LEN, SCALAR_LEN};
use crate::error::{AdaptorError, DecodeError};
use crate::helpers::{array_from_hex_str, decode_array};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Debug, Display};
use zeroize::Zeroizing;

/// A point in BIP-340 x-only form: the x-coordinate, with the y-coordinate implicitly taken to be even.
///
/// Values built by this crate always lift to a curve point. Bytes received from elsewhere must go through
/// [`XOnlyPoint::from_slice`], which performs the lift and rejects x-coordinates that are not on the curve.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct XOnlyPoint([u8; SCALAR_LEN]);

impl XOnlyPoint {
    /// The x-only encoding of `point`. The caller guarantees `point` is not the identity.
    pub(crate) fn from_point<B: CurveBackend>(point: &B::Point) -> Self {
        Self(B::x_only(point))
    }

    pub fn from_slice<B: CurveBackend>(bytes: &[u8]) -> Result<Self, DecodeError> {
        let x = decode_array::<SCALAR_LEN>("x-only point", bytes)?;
        B::lift_x(&x)?;
        Ok(Self(x))
    }

    pub fn from_hex<B: CurveBackend>(hex: &str) -> Result<Self, DecodeError> {
        let x = array_from_hex_str::<SCALAR_LEN>("x-only point", hex)?;
        B::lift_x(&x)?;
        Ok(Self(x))
    }

    /// The even-y point with this x-coordinate.
    pub fn lift<B: CurveBackend>(&self) -> Result<B::Point, DecodeError> {
        B::lift_x(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; SCALAR_LEN] {
        &self.0
    }

    pub fn as_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Debug for XOnlyPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XOnlyPoint({})", self.as_hex())
    }
}

impl Display for XOnlyPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

impl Serialize for XOnlyPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_hex())
    }
}

/// A BIP-340 signing key.
///
/// The scalar is normalised at construction: if $p\cdot G$ has an odd y-coordinate, $n - p$ is stored instead, so
/// that the stored scalar always matches the x-only public key used in challenges.
///
/// Cloning is safe because the underlying scalar is zeroized on drop automatically.
pub struct SigningKey<B: CurveBackend> {
    secret: Zeroizing<B::Scalar>,
    public_key: XOnlyPoint,
}

impl<B: CurveBackend> SigningKey<B> {
    pub fn new(secret: Zeroizing<B::Scalar>) -> Result<Self, AdaptorError> {
        if B::scalar_is_zero(&secret) {
            return Err(AdaptorError::invalid_input("signing key must be non-zero"));
        }
        let point = B::generator_mul(&secret);
        let secret = if B::has_even_y(&point) { secret } else { Zeroizing::new(B::scalar_neg(&secret)) };
        let public_key = XOnlyPoint::from_point::<B>(&point);
        Ok(Self { secret, public_key })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AdaptorError> {
        let bytes = Zeroizing::new(decode_array::<SCALAR_LEN>("signing key", bytes)?);
        let secret = Zeroizing::new(B::scalar_from_bytes(&bytes)?);
        Self::new(secret)
    }

    pub fn from_hex(hex: &str) -> Result<Self, AdaptorError> {
        let bytes = Zeroizing::new(array_from_hex_str::<SCALAR_LEN>("signing key", hex)?);
        Self::from_bytes(&bytes[..])
    }

    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let secret = random_nonzero_scalar::<B, R>(rng);
            if let Ok(key) = Self::new(secret) {
                return key;
            }
        }
    }

    pub fn public_key(&self) -> &XOnlyPoint {
        &self.public_key
    }

    /// The normalised secret scalar.
    pub fn as_scalar(&self) -> &B::Scalar {
        &self.secret
    }

    /// Big-endian bytes of the normalised secret scalar.
    pub fn to_bytes(&self) -> Zeroizing<[u8; SCALAR_LEN]> {
        Zeroizing::new(B::scalar_to_bytes(&self.secret))
    }

    pub fn as_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.to_bytes()[..]))
    }
}

impl<B: CurveBackend> Clone for SigningKey<B> {
    fn clone(&self) -> Self {
        Self { secret: self.secret.clone(), public_key: self.public_key }
    }
}

impl<B: CurveBackend> Debug for SigningKey<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey({})", self.public_key)
    }
}

/// The adaptor secret $t$, the discrete log of an adaptor point (up to sign).
pub struct AdaptorSecret<B: CurveBackend> {
    secret: Zeroizing<B::Scalar>,
}

impl<B: CurveBackend> AdaptorSecret<B> {
    pub fn new(secret: Zeroizing<B::Scalar>) -> Result<Self, AdaptorError> {
        if B::scalar_is_zero(&secret) {
            return Err(AdaptorError::invalid_input("adaptor secret must be non-zero"));
        }
        Ok(Self { secret })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AdaptorError> {
        let bytes = Zeroizing::new(decode_array::<SCALAR_LEN>("adaptor secret", bytes)?);
        let secret = Zeroizing::new(B::scalar_from_bytes(&bytes)?);
        Self::new(secret)
    }

    pub fn from_hex(hex: &str) -> Result<Self, AdaptorError> {
        let bytes = Zeroizing::new(array_from_hex_str::<SCALAR_LEN>("adaptor secret", hex)?);
        Self::from_bytes(&bytes[..])
    }

    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self { secret: random_nonzero_scalar::<B, R>(rng) }
    }

    /// $T = t\cdot G$, with whatever parity that happens to have.
    pub fn point(&self) -> AdaptorPoint<B> {
        AdaptorPoint { point: B::generator_mul(&self.secret) }
    }

    /// $n - t$
    pub fn negate(&self) -> Self {
        Self { secret: Zeroizing::new(B::scalar_neg(&self.secret)) }
    }

    pub fn as_scalar(&self) -> &B::Scalar {
        &self.secret
    }

    pub fn to_bytes(&self) -> Zeroizing<[u8; SCALAR_LEN]> {
        Zeroizing::new(B::scalar_to_bytes(&self.secret))
    }

    pub fn as_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.to_bytes()[..]))
    }
}

impl<B: CurveBackend> Clone for AdaptorSecret<B> {
    fn clone(&self) -> Self {
        Self { secret: self.secret.clone() }
    }
}

impl<B: CurveBackend> PartialEq for AdaptorSecret<B> {
    fn eq(&self, other: &Self) -> bool {
        *self.secret == *other.secret
    }
}

impl<B: CurveBackend> Eq for AdaptorSecret<B> {}

impl<B: CurveBackend> Debug for AdaptorSecret<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AdaptorSecret")
    }
}

/// An adaptor point $T$ as a full curve point. Unlike the x-only form carried in pre-signatures, this remembers the
/// sign of y.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AdaptorPoint<B: CurveBackend> {
    point: B::Point,
}

impl<B: CurveBackend> AdaptorPoint<B> {
    pub fn from_point(point: B::Point) -> Result<Self, DecodeError> {
        if B::is_identity(&point) {
            return Err(DecodeError::PointAtInfinity);
        }
        Ok(Self { point })
    }

    /// Accepts a 33-byte compressed point, or a 32-byte x-only point (lifted to even y).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let point = match bytes.len() {
            COMPRESSED_POINT_LEN => B::decode_point(&decode_array::<COMPRESSED_POINT_LEN>("adaptor point", bytes)?)?,
            SCALAR_LEN => B::lift_x(&decode_array::<SCALAR_LEN>("adaptor point", bytes)?)?,
            n => return Err(DecodeError::invalid_length("adaptor point", COMPRESSED_POINT_LEN, n)),
        };
        Self::from_point(point)
    }

    pub fn from_hex(hex: &str) -> Result<Self, DecodeError> {
        let bytes = hex::decode(hex.trim())?;
        Self::from_bytes(&bytes)
    }

    pub fn as_point(&self) -> &B::Point {
        &self.point
    }

    pub fn has_even_y(&self) -> bool {
        B::has_even_y(&self.point)
    }

    pub fn to_x_only(&self) -> XOnlyPoint {
        XOnlyPoint::from_point::<B>(&self.point)
    }

    pub fn negate(&self) -> Self {
        Self { point: B::negate(&self.point) }
    }

    pub fn to_bytes(&self) -> [u8; COMPRESSED_POINT_LEN] {
        B::encode_point(&self.point)
    }

    pub fn as_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl<B: CurveBackend> Debug for AdaptorPoint<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AdaptorPoint({})", self.as_hex())
    }
}

impl<B: CurveBackend> Serialize for AdaptorPoint<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_hex())
    }
}

impl<'de, B: CurveBackend> Deserialize<'de> for AdaptorPoint<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        AdaptorPoint::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

fn random_nonzero_scalar<B: CurveBackend, R: RngCore + CryptoRng>(rng: &mut R) -> Zeroizing<B::Scalar> {
    let mut bytes = Zeroizing::new([0u8; SCALAR_LEN]);
    loop {
        rng.fill_bytes(&mut bytes[..]);
        if let Ok(s) = B::nonzero_scalar_from_bytes(&bytes) {
            return Zeroizing::new(s);
        }
    }
}
