use crate::backend::{CurveBackend, COMPRESSED_POINT_LEN, SCALAR_LEN};
use crate::error::DecodeError;
use k256::elliptic_curve::group::GroupEncoding;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::{AffineCoordinates, DecompressPoint};
use k256::elliptic_curve::subtle::Choice;
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, FieldBytes, ProjectivePoint, Scalar, U256};

/// secp256k1 arithmetic provided by the RustCrypto `k256` crate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Secp256k1;

impl CurveBackend for Secp256k1 {
    type Scalar = Scalar;
    type Point = ProjectivePoint;

    const NAME: &'static str = "secp256k1 (k256)";

    fn generator_mul(k: &Scalar) -> ProjectivePoint {
        ProjectivePoint::GENERATOR * k
    }

    fn mul(p: &ProjectivePoint, k: &Scalar) -> ProjectivePoint {
        *p * k
    }

    fn add(p: &ProjectivePoint, q: &ProjectivePoint) -> ProjectivePoint {
        *p + q
    }

    fn negate(p: &ProjectivePoint) -> ProjectivePoint {
        -*p
    }

    fn is_identity(p: &ProjectivePoint) -> bool {
        *p == ProjectivePoint::IDENTITY
    }

    fn has_even_y(p: &ProjectivePoint) -> bool {
        !bool::from(p.to_affine().y_is_odd())
    }

    fn lift_x(x: &[u8; SCALAR_LEN]) -> Result<ProjectivePoint, DecodeError> {
        let x = FieldBytes::from(*x);
        let point = Option::<AffinePoint>::from(AffinePoint::decompress(&x, Choice::from(0u8)))
            .ok_or(DecodeError::NotOnCurve)?;
        Ok(ProjectivePoint::from(point))
    }

    fn x_only(p: &ProjectivePoint) -> [u8; SCALAR_LEN] {
        let mut out = [0u8; SCALAR_LEN];
        out.copy_from_slice(&p.to_affine().x());
        out
    }

    fn decode_point(bytes: &[u8; COMPRESSED_POINT_LEN]) -> Result<ProjectivePoint, DecodeError> {
        // k256 also accepts its 0x05 compact form, which carries no y sign
        if !matches!(bytes[0], 0x02 | 0x03) {
            return Err(DecodeError::InvalidPointEncoding);
        }
        let mut repr = <ProjectivePoint as GroupEncoding>::Repr::default();
        repr.copy_from_slice(bytes);
        let point = Option::<ProjectivePoint>::from(ProjectivePoint::from_bytes(&repr))
            .ok_or(DecodeError::InvalidPointEncoding)?;
        if Self::is_identity(&point) {
            return Err(DecodeError::PointAtInfinity);
        }
        Ok(point)
    }

    fn encode_point(p: &ProjectivePoint) -> [u8; COMPRESSED_POINT_LEN] {
        let mut out = [0u8; COMPRESSED_POINT_LEN];
        out.copy_from_slice(&p.to_bytes());
        out
    }

    fn scalar_from_bytes(bytes: &[u8; SCALAR_LEN]) -> Result<Scalar, DecodeError> {
        Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*bytes))).ok_or(DecodeError::ScalarOutOfRange)
    }

    fn scalar_reduce(bytes: &[u8; SCALAR_LEN]) -> Scalar {
        <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*bytes))
    }

    fn scalar_to_bytes(s: &Scalar) -> [u8; SCALAR_LEN] {
        let mut out = [0u8; SCALAR_LEN];
        out.copy_from_slice(&s.to_bytes());
        out
    }

    fn scalar_add(a: &Scalar, b: &Scalar) -> Scalar {
        *a + b
    }

    fn scalar_sub(a: &Scalar, b: &Scalar) -> Scalar {
        *a - b
    }

    fn scalar_mul(a: &Scalar, b: &Scalar) -> Scalar {
        *a * b
    }

    fn scalar_neg(a: &Scalar) -> Scalar {
        -*a
    }

    fn scalar_is_zero(a: &Scalar) -> bool {
        *a == Scalar::ZERO
    }
}
