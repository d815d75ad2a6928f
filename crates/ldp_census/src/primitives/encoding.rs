//! Wire encodings for field elements and points.
//!
//! Field elements are fixed-width 32-byte **big-endian** integers. Points
//! are either an `(x, y)` pair of such elements (64 bytes) or the 32-byte
//! compressed Pallas encoding. Every point decoded here is checked against
//! the curve equation.

use ff::PrimeField as _;
use group::GroupEncoding as _;

use super::{Fp, Point, coordinates, from_coordinates};
use crate::error::EncodingError;

/// Width in bytes of an encoded field element.
pub const FIELD_BYTES: usize = 32;

/// Encode a field element as 32 big-endian bytes.
#[must_use]
pub fn fp_to_bytes(value: &Fp) -> [u8; FIELD_BYTES] {
    let mut bytes = value.to_repr();
    bytes.reverse();
    bytes
}

/// Decode 32 big-endian bytes, rejecting values `>= p`.
pub fn fp_from_bytes(bytes: &[u8; FIELD_BYTES]) -> Result<Fp, EncodingError> {
    let mut repr = *bytes;
    repr.reverse();
    Option::from(Fp::from_repr(repr)).ok_or(EncodingError::NonCanonicalField)
}

/// Encode a point as its big-endian `(x, y)` coordinates.
#[must_use]
pub fn point_to_coordinate_bytes(point: &Point) -> [u8; 2 * FIELD_BYTES] {
    let (x, y) = coordinates(point);
    let mut out = [0u8; 2 * FIELD_BYTES];
    let (x_out, y_out) = out.split_at_mut(FIELD_BYTES);
    x_out.copy_from_slice(&fp_to_bytes(&x));
    y_out.copy_from_slice(&fp_to_bytes(&y));
    out
}

/// Decode a big-endian `(x, y)` coordinate pair.
pub fn point_from_coordinate_bytes(bytes: &[u8; 2 * FIELD_BYTES]) -> Result<Point, EncodingError> {
    let (x_bytes, y_bytes) = bytes.split_at(FIELD_BYTES);
    let x = fp_from_bytes(x_bytes.try_into().map_err(|_len| EncodingError::NonCanonicalField)?)?;
    let y = fp_from_bytes(y_bytes.try_into().map_err(|_len| EncodingError::NonCanonicalField)?)?;
    from_coordinates(x, y)
}

/// Compressed 32-byte point encoding.
#[must_use]
pub fn point_to_bytes(point: &Point) -> [u8; FIELD_BYTES] {
    point.to_bytes()
}

/// Decode a compressed point.
pub fn point_from_bytes(bytes: &[u8; FIELD_BYTES]) -> Result<Point, EncodingError> {
    Option::from(Point::from_bytes(bytes)).ok_or(EncodingError::PointNotOnCurve)
}
