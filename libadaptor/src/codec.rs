use crate::backend::{CurveBackend, SCALAR_LEN};
use crate::error::ReadError;
use crate::keys::XOnlyPoint;
use std::io::{self, Read, Write};

pub trait Writable {
    fn write<W: Write>(&self, writer: &mut W) -> io::Result<()>;
}

pub trait Readable: Sized {
    fn read<R: Read>(reader: &mut R) -> Result<Self, ReadError>;
}

pub fn read_bytes<R: Read + ?Sized, const N: usize>(reader: &mut R, field: &str) -> Result<[u8; N], ReadError> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|e| ReadError::new(field, e.to_string()))?;
    Ok(buf)
}

pub fn read_x_only<B: CurveBackend, R: Read + ?Sized>(reader: &mut R, field: &str) -> Result<XOnlyPoint, ReadError> {
    let buf = read_bytes::<R, SCALAR_LEN>(reader, field)?;
    XOnlyPoint::from_slice::<B>(&buf).map_err(|e| ReadError::new(field, e.to_string()))
}

/// Read a big-endian scalar in $[1, n)$.
pub fn read_scalar<B: CurveBackend, R: Read + ?Sized>(reader: &mut R, field: &str) -> Result<B::Scalar, ReadError> {
    let buf = read_bytes::<R, SCALAR_LEN>(reader, field)?;
    B::nonzero_scalar_from_bytes(&buf).map_err(|e| ReadError::new(field, e.to_string()))
}

pub fn write_x_only<W: Write>(writer: &mut W, point: &XOnlyPoint) -> io::Result<()> {
    writer.write_all(point.as_bytes())
}

pub fn write_scalar<B: CurveBackend, W: Write>(writer: &mut W, scalar: &B::Scalar) -> io::Result<()> {
    writer.write_all(&B::scalar_to_bytes(scalar))
}
