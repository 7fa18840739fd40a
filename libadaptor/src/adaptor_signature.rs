use crate::backend::{CurveBackend, SCALAR_LEN};
use crate::codec::{read_scalar, read_x_only, write_scalar, write_x_only, Readable, Writable};
use crate::error::{AdaptorError, DecodeError, ReadError};
use crate::helpers::decode_array;
use crate::keys::{AdaptorPoint, AdaptorSecret, XOnlyPoint};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::io::{self, Read, Write};

/// Wire length of a pre-signature: `R || s' || T`.
pub const PRE_SIGNATURE_LEN: usize = 3 * SCALAR_LEN;
/// Wire length of a BIP-340 signature: `R || s`.
pub const SIGNATURE_LEN: usize = 2 * SCALAR_LEN;

/// An adaptor pre-signature $(R, s', T)$.
///
/// $R$ is the even-y nonce point and $T$ the adaptor point, both x-only. The challenge behind $s'$ commits to
/// $R + T$, so the pre-signature only becomes a valid BIP-340 signature once the discrete log of $T$ is added.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(non_snake_case)]
pub struct PreSignature<B: CurveBackend> {
    R: XOnlyPoint,
    s: B::Scalar,
    T: XOnlyPoint,
}

impl<B: CurveBackend> PreSignature<B> {
    #[allow(non_snake_case)]
    pub(crate) fn new(R: XOnlyPoint, s: B::Scalar, T: XOnlyPoint) -> Self {
        Self { R, s, T }
    }

    pub fn nonce_point(&self) -> &XOnlyPoint {
        &self.R
    }

    /// $s'$
    pub fn s(&self) -> &B::Scalar {
        &self.s
    }

    pub fn adaptor_point(&self) -> &XOnlyPoint {
        &self.T
    }
}

/// A standard BIP-340 signature $(R, s)$. Adapted pre-signatures are indistinguishable from ordinary signatures.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(non_snake_case)]
pub struct Signature<B: CurveBackend> {
    R: XOnlyPoint,
    s: B::Scalar,
}

impl<B: CurveBackend> Signature<B> {
    #[allow(non_snake_case)]
    pub(crate) fn new(R: XOnlyPoint, s: B::Scalar) -> Self {
        Self { R, s }
    }

    pub fn nonce_point(&self) -> &XOnlyPoint {
        &self.R
    }

    pub fn s(&self) -> &B::Scalar {
        &self.s
    }
}

macro_rules! wire_impl {
    (@bytes point, $v:expr) => { *$v.as_bytes() };
    (@bytes scalar, $v:expr) => { B::scalar_to_bytes(&$v) };
    (@decode point, $b:expr) => { XOnlyPoint::from_slice::<B>($b)? };
    (@decode scalar, $b:expr) => { B::nonzero_scalar_from_bytes(&decode_array::<SCALAR_LEN>("scalar", $b)?)? };
    (@write point, $w:ident, $v:expr) => { write_x_only($w, &$v)? };
    (@write scalar, $w:ident, $v:expr) => { write_scalar::<B, _>($w, &$v)? };
    (@read point, $r:ident, $f:expr) => { read_x_only::<B, _>($r, $f)? };
    (@read scalar, $r:ident, $f:expr) => { read_scalar::<B, _>($r, $f)? };

    ($name:ident ($len:expr) $($field:ident: $kind:ident),+) => {
        #[allow(non_snake_case)]
        impl<B: CurveBackend> $name<B> {
            pub fn to_bytes(&self) -> [u8; $len] {
                let mut out = [0u8; $len];
                let parts = [$( wire_impl!(@bytes $kind, self.$field) ),+];
                for (chunk, part) in out.chunks_exact_mut(SCALAR_LEN).zip(parts) {
                    chunk.copy_from_slice(&part);
                }
                out
            }

            /// Decode from the fixed-size wire form. Every point must lift to a curve point and every scalar must
            /// lie in $[1, n)$.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
                if bytes.len() != $len {
                    return Err(DecodeError::invalid_length(stringify!($name), $len, bytes.len()));
                }
                let mut chunks = bytes.chunks_exact(SCALAR_LEN);
                $(
                    let chunk = chunks.next().ok_or(DecodeError::invalid_length(stringify!($name), $len, bytes.len()))?;
                    let $field = wire_impl!(@decode $kind, chunk);
                )+
                Ok(Self { $( $field ),+ })
            }

            pub fn from_hex(hex: &str) -> Result<Self, DecodeError> {
                let bytes = hex::decode(hex.trim())?;
                Self::from_bytes(&bytes)
            }

            pub fn as_hex(&self) -> String {
                hex::encode(self.to_bytes())
            }
        }

        impl<B: CurveBackend> Writable for $name<B> {
            fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
                $( wire_impl!(@write $kind, writer, self.$field); )+
                Ok(())
            }
        }

        impl<B: CurveBackend> Readable for $name<B> {
            #[allow(non_snake_case)]
            fn read<R: Read>(reader: &mut R) -> Result<Self, ReadError> {
                $(
                    let $field = wire_impl!(@read $kind, reader, concat!(stringify!($name), ".", stringify!($field)));
                )+
                Ok(Self { $( $field ),+ })
            }
        }

        impl<B: CurveBackend> Serialize for $name<B> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.as_hex())
            }
        }

        impl<'de, B: CurveBackend> Deserialize<'de> for $name<B> {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let hex_str = String::deserialize(deserializer)?;
                Self::from_hex(&hex_str).map_err(serde::de::Error::custom)
            }
        }
    };
}

wire_impl!(PreSignature (PRE_SIGNATURE_LEN) R: point, s: scalar, T: point);
wire_impl!(Signature (SIGNATURE_LEN) R: point, s: scalar);

/// How an extracted adaptor secret $t$ relates to the x-only adaptor point of the pre-signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointRelation {
    /// $t\cdot G$ is the even-y lift of $T$.
    EvenLift,
    /// $t\cdot G$ is the negation of the even-y lift of $T$.
    NegatedLift,
}

/// The result of extracting the adaptor secret from a pre-signature and its completed signature.
///
/// The x-only adaptor point cannot tell $T$ from $-T$, so the extracted scalar may be $t$ or $n - t$. Callers that
/// know the full adaptor point should use [`ExtractedAdaptor::resolve`] to get the scalar with $t\cdot G = T$ exactly.
#[derive(Clone, Debug)]
pub struct ExtractedAdaptor<B: CurveBackend> {
    secret: AdaptorSecret<B>,
    relation: PointRelation,
    adaptor: XOnlyPoint,
}

impl<B: CurveBackend> ExtractedAdaptor<B> {
    pub(crate) fn new(secret: AdaptorSecret<B>, relation: PointRelation, adaptor: XOnlyPoint) -> Self {
        Self { secret, relation, adaptor }
    }

    pub fn secret(&self) -> &AdaptorSecret<B> {
        &self.secret
    }

    pub fn relation(&self) -> PointRelation {
        self.relation
    }

    pub fn into_secret(self) -> AdaptorSecret<B> {
        self.secret
    }

    /// Return the scalar $t$ with $t\cdot G$ equal to `point`, negating the extracted value if necessary.
    pub fn resolve(&self, point: &AdaptorPoint<B>) -> Result<AdaptorSecret<B>, AdaptorError> {
        if point.to_x_only() != self.adaptor {
            return Err(AdaptorError::AdaptorMismatch);
        }
        if self.secret.point() == *point {
            Ok(self.secret.clone())
        } else {
            Ok(self.secret.negate())
        }
    }
}
