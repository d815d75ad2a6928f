//! Private keys: the seed, the census decryption key and authority signing
//! keys.

use ff::{Field as _, FromUniformBytes as _, PrimeField as _};
use group::Curve as _;
use rand::{CryptoRng, RngCore};
use reddsa::orchard::SpendAuth;

use super::{
    public::{EncryptionKey, VerificationKey},
    signature::Signature,
};
use crate::{
    commitment::AddressKey,
    constants::PrfExpand,
    error::CryptoError,
    primitives::{Fp, Fq, base, encoding::fp_to_bytes},
};

/// Raw 32-byte key material.
///
/// The root from which every private key of one party is derived through
/// domain-separated `PRF^expand`:
/// - [`SigningKey`] (`[0x01]`)
/// - [`DecryptionKey`] (`[0x02]`)
/// - [`AddressKey`] (`[0x03]`)
#[derive(Clone, Copy, Debug)]
pub struct Seed([u8; 32]);

impl From<[u8; 32]> for Seed {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Seed {
    /// Sample a fresh seed.
    ///
    /// A failing random source is an [`CryptoError::Initialization`].
    pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Result<Self, CryptoError> {
        let mut bytes = [0u8; 32];
        rng.try_fill_bytes(&mut bytes)
            .map_err(|_err| CryptoError::Initialization)?;
        Ok(Self(bytes))
    }

    /// Derive the authority signing key.
    pub fn signing_key(&self) -> Result<SigningKey, CryptoError> {
        SigningKey::from_seed(&self.0)
    }

    /// Derive the census decryption key.
    pub fn decryption_key(&self) -> Result<DecryptionKey, CryptoError> {
        DecryptionKey::from_seed(&self.0)
    }

    /// Derive the address secret key.
    #[must_use]
    pub fn address_key(&self) -> AddressKey {
        AddressKey::from_seed(&self.0)
    }
}

/// An authority signing key (RedPallas, SpendAuth parameterization).
///
/// Held by the census authority (signing tag shares) and the registration
/// authority (signing member lists).
#[derive(Clone, Copy, Debug)]
pub struct SigningKey(reddsa::SigningKey<SpendAuth>);

impl SigningKey {
    /// Derive the signing key from seed bytes.
    ///
    /// 1. $sk = \text{ToScalar}(\text{PRF}^{\text{expand}}_{seed}([0\text{x}01]))$,
    ///    BLAKE2b-512 reduced to $\mathbb{F}_q$.
    /// 2. Reject $sk = 0$.
    /// 3. **Sign normalization**: if $[sk]\,\mathcal{G}$ has $\tilde{y} = 1$,
    ///    negate $sk$ so the verification key has $\tilde{y} = 0$.
    fn from_seed(seed: &[u8; 32]) -> Result<Self, CryptoError> {
        let sk = Fq::from_uniform_bytes(&PrfExpand::SIGNING.with(seed));
        if bool::from(sk.is_zero()) {
            return Err(CryptoError::Initialization);
        }
        let key = Self::try_from(sk)?;

        let vk_bytes: [u8; 32] = key.verification_key().into();
        let normalized = if vk_bytes[31] >> 7u8 == 1 {
            Self::try_from(-sk)?
        } else {
            key
        };
        tracing::debug!("derived authority signing key");
        Ok(normalized)
    }

    /// Derive the verification key: $vk = [sk]\,\mathcal{G}$.
    #[must_use]
    pub fn verification_key(&self) -> VerificationKey {
        // [sk] times the SpendAuth basepoint, not a type conversion.
        VerificationKey(reddsa::VerificationKey::from(&self.0))
    }

    /// Sign a relation-field element, encoded as 32 big-endian bytes.
    pub fn sign(&self, rng: &mut (impl RngCore + CryptoRng), msg: &Fp) -> Signature {
        Signature(self.0.sign(rng, &fp_to_bytes(msg)))
    }
}

impl TryFrom<Fq> for SigningKey {
    type Error = CryptoError;

    fn try_from(sk: Fq) -> Result<Self, Self::Error> {
        reddsa::SigningKey::<SpendAuth>::try_from(sk.to_repr())
            .map(Self)
            .map_err(|_err| CryptoError::Initialization)
    }
}

/// The census decryption key $a \in \mathbb{F}_q$.
#[derive(Clone, Copy, Debug)]
pub struct DecryptionKey(Fq);

impl DecryptionKey {
    /// `a = ToScalar(PRF^expand_seed([0x02]))`; zero is rejected.
    fn from_seed(seed: &[u8; 32]) -> Result<Self, CryptoError> {
        let sk = Fq::from_uniform_bytes(&PrfExpand::DECRYPTION.with(seed));
        if bool::from(sk.is_zero()) {
            return Err(CryptoError::Initialization);
        }
        tracing::debug!("derived census decryption key");
        Ok(Self(sk))
    }

    /// Derive the census encryption key $A = [a]\,\mathcal{G}$.
    #[must_use]
    pub fn encryption_key(&self) -> EncryptionKey {
        EncryptionKey((base() * self.0).to_affine())
    }

    /// The secret scalar.
    #[must_use]
    pub(crate) const fn inner(&self) -> &Fq {
        &self.0
    }
}

impl TryFrom<Fq> for DecryptionKey {
    type Error = CryptoError;

    fn try_from(sk: Fq) -> Result<Self, Self::Error> {
        if bool::from(sk.is_zero()) {
            Err(CryptoError::Initialization)
        } else {
            Ok(Self(sk))
        }
    }
}
