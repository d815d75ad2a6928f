//! Field, group and base-point primitives.
//!
//! The relation field is the Pallas base field $\mathbb{F}_p$: commitments,
//! nullifiers, secrets and point coordinates all live there. Curve scalars
//! (private keys, ephemeral randomness) live in the Pallas scalar field
//! $\mathbb{F}_q$. Because $p < q$, every canonical $\mathbb{F}_p$
//! representation is also a canonical $\mathbb{F}_q$ representation, which
//! is how small relation values are lifted into scalars.

use ff::PrimeField as _;
use group::Curve as _;
use lazy_static::lazy_static;
use pasta_curves::arithmetic::{Coordinates, CurveAffine as _, CurveExt as _};
use pasta_curves::pallas;

use crate::{constants::ELGAMAL_DOMAIN, error::EncodingError};

pub mod encoding;

pub use ff::Field;

/// Pallas base field element $\mathbb{F}_p$, the relation field.
pub type Fp = pallas::Base;

/// Pallas scalar field element $\mathbb{F}_q$.
pub type Fq = pallas::Scalar;

/// Affine Pallas point.
pub type Point = pallas::Affine;

lazy_static! {
    static ref BASE: Point = pallas::Point::hash_to_curve(ELGAMAL_DOMAIN)(b"G").to_affine();
}

/// The fixed base point $\mathcal{G}$ used for message embedding, ElGamal
/// keys and the ephemeral commitment.
///
/// Derived once per process as `hash_to_curve("ldp-census:ElGamal")(b"G")`.
#[must_use]
pub fn base() -> Point {
    *BASE
}

/// Lift a relation-field element into the scalar field by its canonical
/// integer value.
pub fn fp_to_scalar(value: &Fp) -> Result<Fq, EncodingError> {
    Option::from(Fq::from_repr(value.to_repr())).ok_or(EncodingError::NonCanonicalField)
}

/// Affine `(x, y)` coordinates of a point.
///
/// The identity has no affine coordinates; it maps to `(0, 0)`, which is
/// not on the curve (`0 != 5`) and therefore never collides with a real
/// point.
#[must_use]
pub fn coordinates(point: &Point) -> (Fp, Fp) {
    let coords: Option<Coordinates<Point>> = point.coordinates().into();
    coords.map_or((Fp::ZERO, Fp::ZERO), |xy| (*xy.x(), *xy.y()))
}

/// Build a point from affine coordinates, checking the curve equation.
///
/// `(0, 0)` is accepted as the identity, mirroring [`coordinates`].
pub fn from_coordinates(x: Fp, y: Fp) -> Result<Point, EncodingError> {
    Option::from(Point::from_xy(x, y)).ok_or(EncodingError::PointNotOnCurve)
}

#[cfg(test)]
mod tests {
    use ff::PrimeField as _;
    use group::prime::PrimeCurveAffine as _;

    use super::*;

    #[test]
    fn base_is_deterministic_and_not_identity() {
        assert_eq!(base(), base());
        assert!(!bool::from(base().is_identity()));
    }

    #[test]
    fn coordinates_round_trip() {
        let point = (base() * Fq::from(7u64)).to_affine();
        let (x, y) = coordinates(&point);
        assert_eq!(from_coordinates(x, y).unwrap(), point);
    }

    #[test]
    fn identity_coordinates_round_trip() {
        let (x, y) = coordinates(&Point::identity());
        assert_eq!((x, y), (Fp::ZERO, Fp::ZERO));
        assert_eq!(from_coordinates(x, y).unwrap(), Point::identity());
    }

    #[test]
    fn off_curve_coordinates_rejected() {
        let (x, y) = coordinates(&base());
        assert_eq!(
            from_coordinates(x, y + Fp::ONE),
            Err(EncodingError::PointNotOnCurve)
        );
    }

    #[test]
    fn small_values_lift_to_equal_scalars() {
        let lifted = fp_to_scalar(&Fp::from(45u64)).unwrap();
        assert_eq!(lifted, Fq::from(45u64));
    }

    #[test]
    fn every_base_field_element_lifts() {
        let lifted = fp_to_scalar(&-Fp::ONE).unwrap();
        assert_eq!(lifted.to_repr(), (-Fp::ONE).to_repr());
    }
}
