//! The two authorities a respondent interacts with.
//!
//! - [`CensusAuthority`]: contributes $\xi_{census}$ to the shared
//!   blinding scalar, signs it, and decrypts submitted responses.
//! - [`RegistrationAuthority`]: attests that a respondent's `id` belongs to
//!   a registered member list.
//!
//! Both hold long-lived keys that are never mutated after construction.

#![expect(
    clippy::module_name_repetitions,
    reason = "authorities are named by role"
)]

use core::iter;

use ff::Field as _;
use rand::{CryptoRng, RngCore};

use crate::{
    codec::{Message, MessageTable},
    commitment::{AddressPublicKey, Commitment, Nullifier, commit},
    elgamal::{Ciphertext, decrypt},
    error::CryptoError,
    keys::{DecryptionKey, EncryptionKey, Seed, Signature, SigningKey, VerificationKey},
    primitives::Fp,
};

/// The census authority's contribution to a tag establishment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CensusShare {
    /// $\xi_{census}$
    pub xi_census: Fp,
    /// $H(cm_{\xi_{user}} \| \nu_1 \| \xi_{census})$
    pub signed_data: Fp,
    /// Signature on `signed_data`.
    pub signature: Signature,
}

/// The census authority.
#[derive(Clone, Copy, Debug)]
pub struct CensusAuthority {
    signing: SigningKey,
    decryption: DecryptionKey,
}

impl CensusAuthority {
    /// Derive both census keys from one seed.
    pub fn from_seed(seed: &Seed) -> Result<Self, CryptoError> {
        Ok(Self {
            signing: seed.signing_key()?,
            decryption: seed.decryption_key()?,
        })
    }

    /// Verification key for census signatures.
    #[must_use]
    pub fn verification_key(&self) -> VerificationKey {
        self.signing.verification_key()
    }

    /// Encryption key responses are encrypted under.
    #[must_use]
    pub fn encryption_key(&self) -> EncryptionKey {
        self.decryption.encryption_key()
    }

    /// Sample $\xi_{census}$ and sign it against the respondent's request.
    pub fn issue_share(
        &self,
        cm_xi_user: Commitment,
        nu1: Nullifier,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> CensusShare {
        let xi_census = Fp::random(&mut *rng);
        self.issue_share_with(xi_census, cm_xi_user, nu1, rng)
    }

    /// Sign a chosen $\xi_{census}$ against the respondent's request.
    pub fn issue_share_with(
        &self,
        xi_census: Fp,
        cm_xi_user: Commitment,
        nu1: Nullifier,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> CensusShare {
        let signed_data = commit(&[cm_xi_user.into(), nu1.into(), xi_census]);
        let signature = self.signing.sign(rng, &signed_data);
        tracing::debug!("issued census share");
        CensusShare {
            xi_census,
            signed_data,
            signature,
        }
    }

    /// Decrypt a submitted response.
    pub fn open(&self, ct: &Ciphertext, table: &MessageTable) -> Result<Message, CryptoError> {
        decrypt(&self.decryption, ct, table)
    }
}

/// A registration authority's attestation of one member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    /// The member list, in signing order.
    pub apk_list: Vec<AddressPublicKey>,
    /// $H(apk_1 \| \cdots \| apk_n \| id)$
    pub signed_data: Fp,
    /// Signature on `signed_data`.
    pub signature: Signature,
}

/// The registration authority.
#[derive(Clone, Copy, Debug)]
pub struct RegistrationAuthority {
    signing: SigningKey,
}

impl RegistrationAuthority {
    /// Derive the signing key from a seed.
    pub fn from_seed(seed: &Seed) -> Result<Self, CryptoError> {
        Ok(Self {
            signing: seed.signing_key()?,
        })
    }

    /// Verification key for registration signatures.
    #[must_use]
    pub fn verification_key(&self) -> VerificationKey {
        self.signing.verification_key()
    }

    /// Sign `apk_list` together with the member's `id`.
    pub fn attest(
        &self,
        apk_list: Vec<AddressPublicKey>,
        id: Fp,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Registration {
        let signed_data = commit(&registration_input(&apk_list, id));
        let signature = self.signing.sign(rng, &signed_data);
        tracing::debug!(members = apk_list.len(), "attested registration");
        Registration {
            apk_list,
            signed_data,
            signature,
        }
    }
}

/// The registration hash input `apk_1 || ... || apk_n || id`.
pub(crate) fn registration_input(apk_list: &[AddressPublicKey], id: Fp) -> Vec<Fp> {
    apk_list
        .iter()
        .map(|apk| Fp::from(*apk))
        .chain(iter::once(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::commitment::{AddressKey, NullifierIndex};

    #[test]
    fn census_share_signature_verifies() {
        let mut rng = StdRng::seed_from_u64(0);
        let census = CensusAuthority::from_seed(&Seed::random(&mut rng).unwrap()).unwrap();
        let cm = Commitment::of(&[Fp::from(3u64)]);
        let nu1 = Nullifier::derive(&[Fp::from(11u64)], NullifierIndex::Private);
        let share = census.issue_share(cm, nu1, &mut rng);

        assert_eq!(
            share.signed_data,
            commit(&[cm.into(), nu1.into(), share.xi_census])
        );
        census
            .verification_key()
            .verify(&share.signed_data, &share.signature)
            .unwrap();
    }

    #[test]
    fn registration_binds_id() {
        let mut rng = StdRng::seed_from_u64(1);
        let registrar = RegistrationAuthority::from_seed(&Seed::random(&mut rng).unwrap()).unwrap();
        let members: Vec<AddressPublicKey> = (0u8..3)
            .map(|i| AddressKey::from_seed(&[i; 32]).public())
            .collect();
        let registration = registrar.attest(members.clone(), Fp::from(1u64), &mut rng);

        let vk = registrar.verification_key();
        vk.verify(&registration.signed_data, &registration.signature)
            .unwrap();
        let other_id = commit(&registration_input(&members, Fp::from(2u64)));
        vk.verify(&other_id, &registration.signature).unwrap_err();
    }
}
