//! ElGamal encryption of codec messages under the census key.
//!
//! $$K = [r]\,\mathcal{G},\qquad C = [r]\,A + [m]\,\mathcal{G}$$
//!
//! Decryption recovers $[m]\,\mathcal{G} = C - [a]\,K$ and inverts it through
//! a [`MessageTable`]. The scheme is additively homomorphic, but only sums
//! that stay inside the table range can be decrypted.
//!
//! The ephemeral scalar $r$ is an [`EphemeralSecret`]: it cannot be copied
//! and [`encrypt`] consumes it, so one $r$ never masks two messages. What
//! survives encryption is an [`EncryptionOpening`], usable as a relation
//! witness but not for encrypting again.

use ff::{Field as _, FromUniformBytes as _};
use group::Curve as _;
use pasta_curves::pallas;
use rand::{CryptoRng, RngCore};
#[cfg(feature = "serde")]
use serde::de::Error as _;
#[cfg(feature = "serde")]
use serde_big_array::BigArray;

use crate::{
    codec::{Message, MessageTable, encode},
    error::{CryptoError, EncodingError},
    keys::{DecryptionKey, EncryptionKey},
    primitives::{
        Fq, Point, base,
        encoding::{FIELD_BYTES, point_from_bytes, point_to_bytes},
    },
};

/// Single-use encryption randomness $r$.
#[derive(Debug)]
pub struct EphemeralSecret(Fq);

impl EphemeralSecret {
    /// Sample $r$ from 64 uniform bytes.
    ///
    /// A failing random source, or the negligible $r = 0$, is an
    /// [`CryptoError::Initialization`].
    pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Result<Self, CryptoError> {
        let mut bytes = [0u8; 64];
        rng.try_fill_bytes(&mut bytes)
            .map_err(|_err| CryptoError::Initialization)?;
        let scalar = Fq::from_uniform_bytes(&bytes);
        if bool::from(scalar.is_zero()) {
            return Err(CryptoError::Initialization);
        }
        Ok(Self(scalar))
    }
}

/// The randomness of a finished encryption, kept as a witness.
#[derive(Clone, Copy, Debug)]
pub struct EncryptionOpening(Fq);

impl EncryptionOpening {
    /// The scalar $r$.
    #[must_use]
    pub const fn scalar(&self) -> &Fq {
        &self.0
    }
}

/// An ElGamal ciphertext $(K, C)$.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ciphertext {
    /// Ephemeral commitment $K = [r]\,\mathcal{G}$.
    pub ephemeral: Point,
    /// Masked message $C = [r]\,A + [m]\,\mathcal{G}$.
    pub masked: Point,
}

impl Ciphertext {
    /// Encoded size: two compressed points.
    pub const SIZE: usize = 2 * FIELD_BYTES;

    /// Encode as `K || C`, both compressed.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        let (k_out, c_out) = out.split_at_mut(FIELD_BYTES);
        k_out.copy_from_slice(&point_to_bytes(&self.ephemeral));
        c_out.copy_from_slice(&point_to_bytes(&self.masked));
        out
    }

    /// Decode `K || C`, validating both points.
    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Result<Self, EncodingError> {
        let (k_bytes, c_bytes) = bytes.split_at(FIELD_BYTES);
        let ephemeral: &[u8; FIELD_BYTES] = k_bytes
            .try_into()
            .map_err(|_len| EncodingError::PointNotOnCurve)?;
        let masked: &[u8; FIELD_BYTES] = c_bytes
            .try_into()
            .map_err(|_len| EncodingError::PointNotOnCurve)?;
        Ok(Self {
            ephemeral: point_from_bytes(ephemeral)?,
            masked: point_from_bytes(masked)?,
        })
    }
}

/// Encrypt `msg` under `pk`, consuming `secret`.
#[must_use]
pub fn encrypt(
    pk: &EncryptionKey,
    secret: EphemeralSecret,
    msg: Message,
) -> (Ciphertext, EncryptionOpening) {
    let embedded = pallas::Point::from(encode(&msg.to_scalar()));
    let shared = pk.point() * secret.0;
    let ct = Ciphertext {
        ephemeral: (base() * secret.0).to_affine(),
        masked: (shared + embedded).to_affine(),
    };
    tracing::trace!("encrypted census response");
    (ct, EncryptionOpening(secret.0))
}

/// Decrypt `ct` with `sk`, decoding through `table`.
pub fn decrypt(
    sk: &DecryptionKey,
    ct: &Ciphertext,
    table: &MessageTable,
) -> Result<Message, CryptoError> {
    let shared = ct.ephemeral * sk.inner();
    let embedded = (pallas::Point::from(ct.masked) - shared).to_affine();
    table.decode(&embedded)
}

#[cfg(feature = "serde")]
impl serde::Serialize for Ciphertext {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BigArray::serialize(&self.to_bytes(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Ciphertext {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: [u8; Self::SIZE] = BigArray::deserialize(deserializer)?;
        Self::from_bytes(&bytes).map_err(D::Error::custom)
    }
}
