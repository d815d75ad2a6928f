//! Public keys.

use group::prime::PrimeCurveAffine as _;
use reddsa::orchard::SpendAuth;

use super::signature::Signature;
use crate::{
    error::{CryptoError, EncodingError},
    primitives::{
        Fp, Point,
        encoding::{fp_to_bytes, point_from_bytes, point_to_bytes},
    },
};

/// The census encryption key $A = [a]\,\mathcal{G}$.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncryptionKey(pub(super) Point);

impl EncryptionKey {
    /// The key as a curve point.
    #[must_use]
    pub const fn point(&self) -> Point {
        self.0
    }
}

impl From<EncryptionKey> for [u8; 32] {
    fn from(ek: EncryptionKey) -> Self {
        point_to_bytes(&ek.0)
    }
}

impl TryFrom<[u8; 32]> for EncryptionKey {
    type Error = EncodingError;

    /// Rejects off-curve encodings and the identity.
    fn try_from(bytes: [u8; 32]) -> Result<Self, Self::Error> {
        let point = point_from_bytes(&bytes)?;
        if bool::from(point.is_identity()) {
            return Err(EncodingError::InvalidKey);
        }
        Ok(Self(point))
    }
}

/// An authority verification key (RedPallas, SpendAuth parameterization).
#[derive(Clone, Copy, Debug)]
pub struct VerificationKey(pub(super) reddsa::VerificationKey<SpendAuth>);

impl VerificationKey {
    /// Verify a signature over a relation-field element.
    pub fn verify(&self, msg: &Fp, sig: &Signature) -> Result<(), reddsa::Error> {
        self.0.verify(&fp_to_bytes(msg), &sig.0)
    }

    /// The key as a curve point, for public-input encoding.
    pub fn point(&self) -> Result<Point, CryptoError> {
        let bytes: [u8; 32] = (*self).into();
        Ok(point_from_bytes(&bytes)?)
    }
}

impl PartialEq for VerificationKey {
    fn eq(&self, other: &Self) -> bool {
        <[u8; 32]>::from(self.0) == <[u8; 32]>::from(other.0)
    }
}

impl Eq for VerificationKey {}

impl From<VerificationKey> for [u8; 32] {
    fn from(vk: VerificationKey) -> Self {
        vk.0.into()
    }
}

impl TryFrom<[u8; 32]> for VerificationKey {
    type Error = EncodingError;

    fn try_from(bytes: [u8; 32]) -> Result<Self, Self::Error> {
        reddsa::VerificationKey::<SpendAuth>::try_from(bytes)
            .map(Self)
            .map_err(|_err| EncodingError::InvalidKey)
    }
}
