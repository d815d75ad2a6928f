//! Authority signatures.

use reddsa::orchard::SpendAuth;
#[cfg(feature = "serde")]
use serde_big_array::BigArray;

/// A RedPallas signature, encoded as `R || s` (64 bytes).
#[derive(Clone, Copy, Debug)]
pub struct Signature(pub reddsa::Signature<SpendAuth>);

impl From<[u8; 64]> for Signature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(reddsa::Signature::<SpendAuth>::from(bytes))
    }
}

impl From<Signature> for [u8; 64] {
    fn from(sig: Signature) -> [u8; 64] {
        <[u8; 64]>::from(sig.0)
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        <[u8; 64]>::from(*self) == <[u8; 64]>::from(*other)
    }
}

impl Eq for Signature {}

#[cfg(feature = "serde")]
impl serde::Serialize for Signature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bytes: [u8; 64] = (*self).into();
        BigArray::serialize(&bytes, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Signature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: [u8; 64] = BigArray::deserialize(deserializer)?;
        Ok(Self::from(bytes))
    }
}
