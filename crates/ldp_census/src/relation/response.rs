//! Response-Submission relation.
//!
//! The respondent encrypts the randomized response of its registered `id`
//! to the census authority, with coins drawn from the blinding scalar
//! $\xi$ fixed during tag establishment.
//!
//! ## Predicate
//!
//! | Clause | Statement |
//! | ------ | --------- |
//! | [`SharedScalarCommitment`](Clause::SharedScalarCommitment) | $H(\xi) = cm_\xi$ |
//! | [`FirstCoin`](Clause::FirstCoin) | bit 0 of $\xi$ is $c_0$ |
//! | [`SecondCoin`](Clause::SecondCoin) | bit 1 of $\xi$ is $c_1$ |
//! | [`RandomizedResponse`](Clause::RandomizedResponse) | $\text{RR}(c_0, c_1, id) = ldp$ |
//! | [`Ciphertext`](Clause::Ciphertext) | $[ldp]\,\mathcal{G} + [r]\,A = C$ |
//! | [`EphemeralCommitment`](Clause::EphemeralCommitment) | $[r]\,\mathcal{G} = K$, when $K$ is public |
//! | [`RegistrationSignature`](Clause::RegistrationSignature) | signature on $H(apk_1 \| \cdots \| apk_n \| id)$ verifies under the registration key |
//!
//! Public inputs, in order: $cm_\xi$, $C$, $K$ (if public), census
//! encryption key, registration verification key; points as $(x, y)$.

#![expect(
    clippy::module_name_repetitions,
    reason = "instance parts are named after the relation"
)]

use crate::{
    authority::{Registration, registration_input},
    codec::Message,
    commitment::{AddressPublicKey, Commitment},
    elgamal::{Ciphertext, EncryptionOpening, EphemeralSecret, encrypt},
    error::{Clause, CryptoError},
    keys::{EncryptionKey, Signature, VerificationKey},
    ldp::{Coins, randomized_response, respond},
    primitives::{Fp, Point, base, fp_to_scalar},
};

use super::{Driver, PublicInputs, Relation};

/// Public inputs of a response submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResponsePublic {
    /// $cm_\xi$ from the tag establishment.
    pub cm_xi: Commitment,
    /// Masked component $C$ of the ciphertext.
    pub masked: Point,
    /// Ephemeral component $K$, when bound by the proof.
    pub ephemeral: Option<Point>,
    /// Census encryption key $A$.
    pub census_ek: EncryptionKey,
    /// Registration authority verification key.
    pub registration_vk: VerificationKey,
}

/// Private witness of a response submission.
#[derive(Clone, Debug)]
pub struct ResponseWitness {
    /// Coins read from $\xi$.
    pub coins: Coins,
    /// $\xi$
    pub xi: Fp,
    /// The secret answer.
    pub id: Fp,
    /// The randomized response that was encrypted.
    pub ldp_value: Fp,
    /// Encryption randomness $r$.
    pub opening: EncryptionOpening,
    /// Registered member list.
    pub apk_list: Vec<AddressPublicKey>,
    /// Registration authority signature.
    pub signature: Signature,
}

/// A respondent's secrets going into a submission.
#[derive(Clone, Debug)]
pub struct Respondent {
    /// $\xi$ from the tag establishment.
    pub xi: Fp,
    /// The secret answer.
    pub id: Message,
    /// Attestation of `id` by the registration authority.
    pub registration: Registration,
}

/// A prepared submission: the ciphertext and the relation instance over it.
#[derive(Clone, Debug)]
pub struct Submission {
    /// What the census authority receives.
    pub ciphertext: Ciphertext,
    /// Public inputs.
    pub public: ResponsePublic,
    /// Private witness.
    pub witness: ResponseWitness,
}

/// The Response-Submission relation.
#[derive(Clone, Copy, Debug)]
pub struct ResponseSubmission;

impl ResponseSubmission {
    /// Randomize, encrypt and assemble the instance.
    ///
    /// $K$ is bound as a public input.
    pub fn prepare(
        respondent: &Respondent,
        census_ek: EncryptionKey,
        registration_vk: VerificationKey,
        secret: EphemeralSecret,
    ) -> Result<Submission, CryptoError> {
        let (ldp_value, coins) = randomized_response(&respondent.xi, respondent.id.to_field());
        let (ciphertext, opening) = encrypt(&census_ek, secret, Message::try_from(ldp_value)?);
        tracing::debug!("prepared response submission");
        Ok(Submission {
            ciphertext,
            public: ResponsePublic {
                cm_xi: Commitment::of(&[respondent.xi]),
                masked: ciphertext.masked,
                ephemeral: Some(ciphertext.ephemeral),
                census_ek,
                registration_vk,
            },
            witness: ResponseWitness {
                coins,
                xi: respondent.xi,
                id: respondent.id.to_field(),
                ldp_value,
                opening,
                apk_list: respondent.registration.apk_list.clone(),
                signature: respondent.registration.signature,
            },
        })
    }
}

impl Relation for ResponseSubmission {
    const NAME: &'static str = "ldp-census:response-submission";

    type Public = ResponsePublic;
    type Witness = ResponseWitness;

    fn public_inputs(public: &ResponsePublic) -> Result<PublicInputs, CryptoError> {
        let mut inputs = PublicInputs::default();
        inputs.push_field(public.cm_xi);
        inputs.push_point(&public.masked);
        if let Some(ephemeral) = public.ephemeral {
            inputs.push_point(&ephemeral);
        }
        inputs.push_point(&public.census_ek.point());
        inputs.push_point(&public.registration_vk.point()?);
        Ok(inputs)
    }

    fn synthesize<D: Driver>(
        dr: &mut D,
        public: &ResponsePublic,
        witness: &ResponseWitness,
    ) -> Result<(), CryptoError> {
        // 1. Commitment to xi
        let cm_xi = dr.hash(&[witness.xi]);
        dr.assert_equal(Clause::SharedScalarCommitment, cm_xi, Fp::from(public.cm_xi))?;

        // 2. Coins are the two low bits of xi
        let bits = dr.to_bits(&witness.xi);
        let (low, next) = Coins::from_bits(&bits).to_field();
        let (c0, c1) = witness.coins.to_field();
        dr.assert_equal(Clause::FirstCoin, low, c0)?;
        dr.assert_equal(Clause::SecondCoin, next, c1)?;

        // 3. Randomized response
        dr.assert_equal(
            Clause::RandomizedResponse,
            respond(witness.coins, witness.id),
            witness.ldp_value,
        )?;

        // 4. Ciphertext
        let randomness = witness.opening.scalar();
        let embedded = dr.scalar_mul(&fp_to_scalar(&witness.ldp_value)?, &base());
        let shared = dr.scalar_mul(randomness, &public.census_ek.point());
        let masked = dr.add(&embedded, &shared);
        dr.assert_equal(Clause::Ciphertext, masked, public.masked)?;
        if let Some(ephemeral) = public.ephemeral {
            let derived = dr.scalar_mul(randomness, &base());
            dr.assert_equal(Clause::EphemeralCommitment, derived, ephemeral)?;
        }

        // 5. Registration
        let signed_data = dr.hash(&registration_input(&witness.apk_list, witness.id));
        dr.verify_signature(
            Clause::RegistrationSignature,
            &public.registration_vk,
            &signed_data,
            &witness.signature,
        )
    }
}

#[cfg(test)]
mod tests {
    use ff::Field as _;
    use group::Curve as _;
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::{
        authority::{CensusAuthority, RegistrationAuthority},
        codec::MessageTable,
        commitment::AddressKey,
        keys::Seed,
        relation::{evaluate, record},
    };

    struct Parties {
        census: CensusAuthority,
        registrar: RegistrationAuthority,
    }

    fn parties(rng: &mut StdRng) -> Parties {
        Parties {
            census: CensusAuthority::from_seed(&Seed::random(rng).unwrap()).unwrap(),
            registrar: RegistrationAuthority::from_seed(&Seed::random(rng).unwrap()).unwrap(),
        }
    }

    fn submit(rng: &mut StdRng, parties: &Parties, xi: Fp, id: u64) -> Submission {
        let members = (0u8..4)
            .map(|i| AddressKey::from_seed(&[i; 32]).public())
            .collect();
        let registration = parties.registrar.attest(members, Fp::from(id), rng);
        let respondent = Respondent {
            xi,
            id: Message::try_from(id).unwrap(),
            registration,
        };
        ResponseSubmission::prepare(
            &respondent,
            parties.census.encryption_key(),
            parties.registrar.verification_key(),
            EphemeralSecret::random(rng).unwrap(),
        )
        .unwrap()
    }

    fn opened(parties: &Parties, submission: &Submission) -> u64 {
        parties
            .census
            .open(&submission.ciphertext, MessageTable::shared())
            .unwrap()
            .value()
    }

    /// Coins (0, _): the truth is reported.
    #[test]
    fn truthful_coin_reports_id() {
        let mut rng = StdRng::seed_from_u64(0);
        let parties = parties(&mut rng);
        for xi in [0b100u64, 0b110] {
            let submission = submit(&mut rng, &parties, Fp::from(xi), 1);
            evaluate::<ResponseSubmission>(&submission.public, &submission.witness).unwrap();
            assert_eq!(submission.witness.ldp_value, Fp::ONE);
            assert_eq!(opened(&parties, &submission), 1);
        }
    }

    /// Coins (1, 0): always 1.
    #[test]
    fn first_decoy_reports_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let parties = parties(&mut rng);
        for id in [0u64, 1, 42] {
            let submission = submit(&mut rng, &parties, Fp::from(0b101u64), id);
            evaluate::<ResponseSubmission>(&submission.public, &submission.witness).unwrap();
            assert_eq!(opened(&parties, &submission), 1);
        }
    }

    /// Coins (1, 1): always 0.
    #[test]
    fn second_decoy_reports_zero() {
        let mut rng = StdRng::seed_from_u64(2);
        let parties = parties(&mut rng);
        for id in [0u64, 1, 42] {
            let submission = submit(&mut rng, &parties, Fp::from(0b111u64), id);
            evaluate::<ResponseSubmission>(&submission.public, &submission.witness).unwrap();
            assert_eq!(opened(&parties, &submission), 0);
        }
    }

    #[test]
    fn random_xi_is_satisfied() {
        let mut rng = StdRng::seed_from_u64(3);
        let parties = parties(&mut rng);
        for _ in 0u8..8 {
            let xi = Fp::random(&mut rng);
            let submission = submit(&mut rng, &parties, xi, 17);
            evaluate::<ResponseSubmission>(&submission.public, &submission.witness).unwrap();
        }
    }

    #[test]
    fn lying_about_coins_is_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        let parties = parties(&mut rng);
        let mut submission = submit(&mut rng, &parties, Fp::from(0b111u64), 42);
        submission.witness.coins.c0 = false;
        assert_eq!(
            evaluate::<ResponseSubmission>(&submission.public, &submission.witness),
            Err(CryptoError::ConstraintViolation {
                clause: Clause::FirstCoin
            })
        );
    }

    #[test]
    fn wrong_ldp_value_is_rejected() {
        let mut rng = StdRng::seed_from_u64(5);
        let parties = parties(&mut rng);
        let mut submission = submit(&mut rng, &parties, Fp::from(0b100u64), 42);
        submission.witness.ldp_value = Fp::ONE;
        assert_eq!(
            evaluate::<ResponseSubmission>(&submission.public, &submission.witness),
            Err(CryptoError::ConstraintViolation {
                clause: Clause::RandomizedResponse
            })
        );
    }

    #[test]
    fn swapped_ciphertext_is_rejected() {
        let mut rng = StdRng::seed_from_u64(6);
        let parties = parties(&mut rng);
        let mut submission = submit(&mut rng, &parties, Fp::from(0b100u64), 42);
        submission.public.masked = (submission.public.masked + base()).to_affine();
        assert_eq!(
            evaluate::<ResponseSubmission>(&submission.public, &submission.witness),
            Err(CryptoError::ConstraintViolation {
                clause: Clause::Ciphertext
            })
        );
    }

    #[test]
    fn ephemeral_is_optional_but_checked() {
        let mut rng = StdRng::seed_from_u64(7);
        let parties = parties(&mut rng);
        let mut submission = submit(&mut rng, &parties, Fp::from(0b100u64), 42);

        submission.public.ephemeral = Some(base());
        assert_eq!(
            evaluate::<ResponseSubmission>(&submission.public, &submission.witness),
            Err(CryptoError::ConstraintViolation {
                clause: Clause::EphemeralCommitment
            })
        );

        submission.public.ephemeral = None;
        evaluate::<ResponseSubmission>(&submission.public, &submission.witness).unwrap();
        let inputs = ResponseSubmission::public_inputs(&submission.public).unwrap();
        // cm_xi, C, A, vk
        assert_eq!(inputs.len(), 7);
    }

    #[test]
    fn altered_registration_signature_is_rejected() {
        let mut rng = StdRng::seed_from_u64(9);
        let parties = parties(&mut rng);
        let mut submission = submit(&mut rng, &parties, Fp::from(0b100u64), 42);
        let mut bytes: [u8; 64] = submission.witness.signature.into();
        bytes[40] ^= 1;
        submission.witness.signature = Signature::from(bytes);
        assert_eq!(
            evaluate::<ResponseSubmission>(&submission.public, &submission.witness),
            Err(CryptoError::SignatureInvalid {
                clause: Clause::RegistrationSignature
            })
        );
    }

    #[test]
    fn unregistered_id_fails_signature() {
        let mut rng = StdRng::seed_from_u64(8);
        let parties = parties(&mut rng);
        let mut submission = submit(&mut rng, &parties, Fp::from(0b100u64), 42);
        // Another id under decoy coins keeps the RR clause intact.
        submission.witness.id = Fp::from(43u64);
        submission.witness.coins = Coins::extract(&Fp::from(0b101u64));
        submission.witness.xi = Fp::from(0b101u64);
        submission.public.cm_xi = Commitment::of(&[submission.witness.xi]);
        submission.witness.ldp_value = Fp::ONE;
        let recorder = record::<ResponseSubmission>(&submission.public, &submission.witness).unwrap();
        let failed: Vec<Clause> = recorder
            .assertions()
            .iter()
            .filter(|assertion| !assertion.holds)
            .map(|assertion| assertion.clause)
            .collect();
        assert_eq!(
            failed,
            [Clause::Ciphertext, Clause::RegistrationSignature]
        );
    }
}
