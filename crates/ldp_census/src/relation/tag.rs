//! Tag-Establishment relation.
//!
//! The respondent and the census authority jointly fix a blinding scalar
//! $\xi = \xi_{user} + \xi_{census}$ while the respondent consumes a set of
//! prior commitments $\omega_1 < \cdots < \omega_k$ it owns.
//!
//! ## Protocol
//!
//! 1. The respondent picks $\xi_{user}$ and sends
//!    $cm_{\xi_{user}} = H(\xi_{user})$ and $\nu_1 = H(\omega \| 1)$
//!    ([`TagEstablishment::request`]).
//! 2. The census authority picks $\xi_{census}$ and signs
//!    $H(cm_{\xi_{user}} \| \nu_1 \| \xi_{census})$
//!    ([`CensusAuthority::issue_share`](crate::authority::CensusAuthority::issue_share)).
//! 3. The respondent assembles the instance ([`TagEstablishment::prepare`])
//!    and proves it.
//!
//! ## Predicate
//!
//! | Clause | Statement |
//! | ------ | --------- |
//! | [`SharedScalarSum`](Clause::SharedScalarSum) | $\xi = \xi_{user} + \xi_{census}$ |
//! | [`SharedScalarCommitment`](Clause::SharedScalarCommitment) | $H(\xi) = cm_\xi$ |
//! | [`UserShareCommitment`](Clause::UserShareCommitment) | $H(\xi_{user}) = cm_{\xi_{user}}$ |
//! | [`ListLength`](Clause::ListLength) | $\lvert\omega\rvert = \lvert ask\rvert = \lvert sn_{old}\rvert$ |
//! | [`OmegaOrdering`](Clause::OmegaOrdering) | $\omega$ strictly ascending |
//! | [`SerialNumber`](Clause::SerialNumber) | $H(ask_i \| 1 \| \omega_i) = sn_{old,i}$ |
//! | [`PrivateNullifier`](Clause::PrivateNullifier) | $H(\omega \| 1) = \nu_1$ |
//! | [`PublicNullifier`](Clause::PublicNullifier) | $H(\omega \| 2) = \nu_2$ |
//! | [`OmegaCommitment`](Clause::OmegaCommitment) | $H(\omega) = cm_\omega$ |
//! | [`CensusSignedData`](Clause::CensusSignedData) | $H(cm_{\xi_{user}} \| \nu_1 \| \xi_{census}) = \text{signed}$ |
//! | [`CensusSignature`](Clause::CensusSignature) | signature on `signed` verifies under the census key |
//!
//! Public inputs, in order: $cm_\xi$, $\nu_2$, $sn_{old,1..k}$,
//! $cm_\omega$, census verification key $(x, y)$.

#![expect(
    clippy::module_name_repetitions,
    reason = "instance parts are named after the relation"
)]

use crate::{
    authority::CensusShare,
    commitment::{AddressKey, Commitment, Nullifier, NullifierIndex, SerialNumber},
    constants::SERIAL_NUMBER_TAG,
    error::{Clause, CryptoError},
    keys::{Signature, VerificationKey},
    primitives::{Fp, encoding::fp_to_bytes},
};

use super::{Driver, PublicInputs, Relation};

/// Public inputs of a tag establishment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagPublic {
    /// $cm_\xi$
    pub cm_xi: Commitment,
    /// $\nu_2$, published for double-tag detection.
    pub nu2: Nullifier,
    /// Serial numbers of the consumed commitments, in $\omega$ order.
    pub sn_old: Vec<SerialNumber>,
    /// $cm_\omega$
    pub cm_omega: Commitment,
    /// Census authority verification key.
    pub census_vk: VerificationKey,
}

/// Private witness of a tag establishment.
#[derive(Clone, Debug)]
pub struct TagWitness {
    /// Respondent share $\xi_{user}$.
    pub xi_user: Fp,
    /// Census share $\xi_{census}$.
    pub xi_census: Fp,
    /// $\xi$
    pub xi: Fp,
    /// $cm_{\xi_{user}}$
    pub cm_xi_user: Commitment,
    /// Consumed commitments, ascending.
    pub omega: Vec<Fp>,
    /// Owner of each $\omega_i$.
    pub ask: Vec<AddressKey>,
    /// $\nu_1$
    pub nu1: Nullifier,
    /// Data the census authority signed.
    pub signed_data: Fp,
    /// Census authority signature.
    pub signature: Signature,
}

/// The respondent's first message, with the secrets it keeps.
#[derive(Clone, Debug)]
pub struct TagRequest {
    /// $\xi_{user}$, kept.
    pub xi_user: Fp,
    /// $cm_{\xi_{user}}$, sent.
    pub cm_xi_user: Commitment,
    /// $\nu_1$, sent.
    pub nu1: Nullifier,
    /// Consumed commitments, ascending; kept.
    pub omega: Vec<Fp>,
    /// Owners, aligned with `omega`; kept.
    pub ask: Vec<AddressKey>,
}

/// The Tag-Establishment relation.
#[derive(Clone, Copy, Debug)]
pub struct TagEstablishment;

impl TagEstablishment {
    /// Build the respondent's request.
    ///
    /// `prior` pairs each consumed commitment with its owner. The pairs are
    /// sorted by $\omega$ so the ordering clause holds.
    #[must_use]
    pub fn request(xi_user: Fp, mut prior: Vec<(Fp, AddressKey)>) -> TagRequest {
        prior.sort_by_key(|&(omega, _ask)| fp_to_bytes(&omega));
        let (omega, ask): (Vec<Fp>, Vec<AddressKey>) = prior.into_iter().unzip();
        TagRequest {
            xi_user,
            cm_xi_user: Commitment::of(&[xi_user]),
            nu1: Nullifier::derive(&omega, NullifierIndex::Private),
            omega,
            ask,
        }
    }

    /// Assemble the instance from the request and the census share.
    #[must_use]
    pub fn prepare(
        request: TagRequest,
        share: &CensusShare,
        census_vk: VerificationKey,
    ) -> (TagPublic, TagWitness) {
        let xi = request.xi_user + share.xi_census;
        let sn_old = request
            .omega
            .iter()
            .zip(&request.ask)
            .map(|(omega, ask)| SerialNumber::derive(ask, *omega))
            .collect();
        let public = TagPublic {
            cm_xi: Commitment::of(&[xi]),
            nu2: Nullifier::derive(&request.omega, NullifierIndex::Public),
            sn_old,
            cm_omega: Commitment::of(&request.omega),
            census_vk,
        };
        let witness = TagWitness {
            xi_user: request.xi_user,
            xi_census: share.xi_census,
            xi,
            cm_xi_user: request.cm_xi_user,
            omega: request.omega,
            ask: request.ask,
            nu1: request.nu1,
            signed_data: share.signed_data,
            signature: share.signature,
        };
        (public, witness)
    }
}

impl Relation for TagEstablishment {
    const NAME: &'static str = "ldp-census:tag-establishment";

    type Public = TagPublic;
    type Witness = TagWitness;

    fn public_inputs(public: &TagPublic) -> Result<PublicInputs, CryptoError> {
        let mut inputs = PublicInputs::default();
        inputs.push_field(public.cm_xi);
        inputs.push_field(public.nu2);
        for sn in &public.sn_old {
            inputs.push_field(*sn);
        }
        inputs.push_field(public.cm_omega);
        inputs.push_point(&public.census_vk.point()?);
        Ok(inputs)
    }

    fn synthesize<D: Driver>(
        dr: &mut D,
        public: &TagPublic,
        witness: &TagWitness,
    ) -> Result<(), CryptoError> {
        // 1. Shared scalar
        dr.assert_equal(
            Clause::SharedScalarSum,
            witness.xi_user + witness.xi_census,
            witness.xi,
        )?;

        // 2. Commitments to xi and the user share
        let cm_xi = dr.hash(&[witness.xi]);
        dr.assert_equal(Clause::SharedScalarCommitment, cm_xi, Fp::from(public.cm_xi))?;
        let cm_xi_user = dr.hash(&[witness.xi_user]);
        dr.assert_equal(
            Clause::UserShareCommitment,
            cm_xi_user,
            Fp::from(witness.cm_xi_user),
        )?;

        // 3. Serial numbers of the consumed commitments
        let expected_len = len_to_field(public.sn_old.len());
        dr.assert_equal(Clause::ListLength, len_to_field(witness.omega.len()), expected_len)?;
        dr.assert_equal(Clause::ListLength, len_to_field(witness.ask.len()), expected_len)?;
        dr.assert_ascending(Clause::OmegaOrdering, &witness.omega)?;
        for (index, ((omega, ask), sn)) in witness
            .omega
            .iter()
            .zip(&witness.ask)
            .zip(&public.sn_old)
            .enumerate()
        {
            let derived = dr.hash(&[ask.inner(), Fp::from(SERIAL_NUMBER_TAG), *omega]);
            dr.assert_equal(Clause::SerialNumber(index), derived, Fp::from(*sn))?;
        }

        // 4. Nullifiers
        let mut nullifier_input = witness.omega.clone();
        nullifier_input.push(NullifierIndex::Private.to_field());
        let nu1 = dr.hash(&nullifier_input);
        dr.assert_equal(Clause::PrivateNullifier, nu1, Fp::from(witness.nu1))?;
        if let Some(last) = nullifier_input.last_mut() {
            *last = NullifierIndex::Public.to_field();
        }
        let nu2 = dr.hash(&nullifier_input);
        dr.assert_equal(Clause::PublicNullifier, nu2, Fp::from(public.nu2))?;

        // 5. Commitment to omega
        let cm_omega = dr.hash(&witness.omega);
        dr.assert_equal(Clause::OmegaCommitment, cm_omega, Fp::from(public.cm_omega))?;

        // 6. Census authority signature
        let signed_data = dr.hash(&[
            Fp::from(witness.cm_xi_user),
            Fp::from(witness.nu1),
            witness.xi_census,
        ]);
        dr.assert_equal(Clause::CensusSignedData, signed_data, witness.signed_data)?;
        dr.verify_signature(
            Clause::CensusSignature,
            &public.census_vk,
            &witness.signed_data,
            &witness.signature,
        )
    }
}

fn len_to_field(len: usize) -> Fp {
    Fp::from(u64::try_from(len).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use core::iter;

    use ff::Field as _;
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::{
        authority::CensusAuthority,
        keys::Seed,
        primitives::encoding::fp_from_bytes,
        relation::{evaluate, record},
    };

    struct Fixture {
        authority: CensusAuthority,
        request: TagRequest,
    }

    fn fixture(rng: &mut StdRng, xi_user: u64, count: usize) -> Fixture {
        let authority = CensusAuthority::from_seed(&Seed::random(rng).unwrap()).unwrap();
        let owner = Seed::random(rng).unwrap().address_key();
        let prior = iter::repeat_with(|| (Fp::random(&mut *rng), owner))
            .take(count)
            .collect();
        Fixture {
            authority,
            request: TagEstablishment::request(Fp::from(xi_user), prior),
        }
    }

    fn instance(rng: &mut StdRng, xi_user: u64, count: usize) -> (TagPublic, TagWitness) {
        let Fixture { authority, request } = fixture(rng, xi_user, count);
        let share = authority.issue_share(request.cm_xi_user, request.nu1, rng);
        TagEstablishment::prepare(request, &share, authority.verification_key())
    }

    #[test]
    fn honest_instance_is_satisfied() {
        let mut rng = StdRng::seed_from_u64(0);
        for count in [1, 2, 4] {
            let (public, witness) = instance(&mut rng, 3, count);
            evaluate::<TagEstablishment>(&public, &witness).unwrap();
        }
    }

    /// xi_user = 3, xi_census = 4 gives xi = 7 and cm_xi = H(7); flipping one
    /// bit of cm_xi breaks the relation.
    #[test]
    fn shared_scalar_scenario() {
        let mut rng = StdRng::seed_from_u64(1);
        let Fixture { authority, request } = fixture(&mut rng, 3, 2);
        let share = authority.issue_share_with(Fp::from(4u64), request.cm_xi_user, request.nu1, &mut rng);
        let (mut public, witness) =
            TagEstablishment::prepare(request, &share, authority.verification_key());

        assert_eq!(witness.xi, Fp::from(7u64));
        assert_eq!(public.cm_xi, Commitment::of(&[Fp::from(7u64)]));
        evaluate::<TagEstablishment>(&public, &witness).unwrap();

        let mut bytes = fp_to_bytes(&Fp::from(public.cm_xi));
        bytes[31] ^= 1;
        public.cm_xi = Commitment::from(fp_from_bytes(&bytes).unwrap());
        assert_eq!(
            evaluate::<TagEstablishment>(&public, &witness),
            Err(CryptoError::ConstraintViolation {
                clause: Clause::SharedScalarCommitment
            })
        );
    }

    #[test]
    fn wrong_share_sum_is_rejected() {
        let mut rng = StdRng::seed_from_u64(2);
        let (public, mut witness) = instance(&mut rng, 3, 1);
        witness.xi += Fp::ONE;
        assert_eq!(
            evaluate::<TagEstablishment>(&public, &witness),
            Err(CryptoError::ConstraintViolation {
                clause: Clause::SharedScalarSum
            })
        );
    }

    #[test]
    fn unsorted_omega_violates_ordering() {
        let mut rng = StdRng::seed_from_u64(3);
        let Fixture {
            authority,
            mut request,
        } = fixture(&mut rng, 3, 3);
        request.omega.reverse();
        request.ask.reverse();
        request.nu1 = Nullifier::derive(&request.omega, NullifierIndex::Private);
        let share = authority.issue_share(request.cm_xi_user, request.nu1, &mut rng);
        let (public, witness) =
            TagEstablishment::prepare(request, &share, authority.verification_key());
        assert_eq!(
            evaluate::<TagEstablishment>(&public, &witness),
            Err(CryptoError::ConstraintViolation {
                clause: Clause::OmegaOrdering
            })
        );
    }

    #[test]
    fn tampered_serial_number_is_named() {
        let mut rng = StdRng::seed_from_u64(4);
        let (mut public, witness) = instance(&mut rng, 3, 3);
        if let Some(sn) = public.sn_old.get_mut(1) {
            *sn = SerialNumber::from(Fp::from(*sn) + Fp::ONE);
        }
        assert_eq!(
            evaluate::<TagEstablishment>(&public, &witness),
            Err(CryptoError::ConstraintViolation {
                clause: Clause::SerialNumber(1)
            })
        );
    }

    #[test]
    fn missing_serial_number_is_length_violation() {
        let mut rng = StdRng::seed_from_u64(5);
        let (mut public, witness) = instance(&mut rng, 3, 2);
        public.sn_old.pop();
        assert_eq!(
            evaluate::<TagEstablishment>(&public, &witness),
            Err(CryptoError::ConstraintViolation {
                clause: Clause::ListLength
            })
        );
    }

    #[test]
    fn public_nullifier_is_checked() {
        let mut rng = StdRng::seed_from_u64(6);
        let (mut public, witness) = instance(&mut rng, 3, 2);
        public.nu2 = Nullifier::derive(&witness.omega, NullifierIndex::Private);
        assert_eq!(
            evaluate::<TagEstablishment>(&public, &witness),
            Err(CryptoError::ConstraintViolation {
                clause: Clause::PublicNullifier
            })
        );
    }

    #[test]
    fn foreign_census_key_is_signature_failure() {
        let mut rng = StdRng::seed_from_u64(7);
        let (mut public, witness) = instance(&mut rng, 3, 1);
        let other = CensusAuthority::from_seed(&Seed::random(&mut rng).unwrap()).unwrap();
        public.census_vk = other.verification_key();
        assert_eq!(
            evaluate::<TagEstablishment>(&public, &witness),
            Err(CryptoError::SignatureInvalid {
                clause: Clause::CensusSignature
            })
        );
    }

    #[test]
    fn forged_census_share_breaks_signed_data() {
        let mut rng = StdRng::seed_from_u64(8);
        let (public, mut witness) = instance(&mut rng, 3, 1);
        witness.xi_census += Fp::ONE;
        witness.xi += Fp::ONE;
        let recorder = record::<TagEstablishment>(&public, &witness).unwrap();
        let failed: Vec<Clause> = recorder
            .assertions()
            .iter()
            .filter(|assertion| !assertion.holds)
            .map(|assertion| assertion.clause)
            .collect();
        assert_eq!(
            failed,
            [Clause::SharedScalarCommitment, Clause::CensusSignedData]
        );
    }

    #[test]
    fn public_inputs_layout() {
        let mut rng = StdRng::seed_from_u64(9);
        let (public, _witness) = instance(&mut rng, 3, 4);
        let inputs = TagEstablishment::public_inputs(&public).unwrap();
        // cm_xi, nu2, 4 serial numbers, cm_omega, vk (x, y)
        assert_eq!(inputs.len(), 9);
        assert_eq!(inputs.as_slice().first(), Some(&Fp::from(public.cm_xi)));
        assert_eq!(inputs.as_slice().get(1), Some(&Fp::from(public.nu2)));
    }
}
