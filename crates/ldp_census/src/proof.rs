//! Proving engine interface.
//!
//! The census relations are meant to be proven by an external SNARK. This
//! module fixes the engine boundary and backs it with a keyed BLAKE2b
//! stand-in, so the rest of the crate can be exercised end to end.
//!
//! ## Verification
//!
//! The verifier never sees the witness. It flattens the public values
//! through [`Relation::public_inputs`] and checks the proof against them:
//!
//! 1. Encode the public inputs (32-byte big-endian elements)
//! 2. Recompute the tag over `(relation name, public inputs, nonce)`
//! 3. Compare with the proof's tag
//!
//! ## Proving
//!
//! [`ProvingKey::prove`] evaluates the relation strictly and produces no
//! proof for a witness that fails any clause. [`ProvingKey::prove_unchecked`]
//! models an engine that proves without checking: it always returns a
//! proof, but one built from an unsatisfied witness is rejected by
//! [`VerifyingKey::verify`].
//!
//! The stand-in is designated-verifier: both keys share the setup secret.

use core::fmt;

use rand::{CryptoRng, RngCore};
#[cfg(feature = "serde")]
use serde_big_array::BigArray;

use crate::{
    constants::PROOF_PERSONALIZATION,
    error::CryptoError,
    relation::{self, PublicInputs, Relation},
};

const NONCE_BYTES: usize = 32;
const TAG_BYTES: usize = 64;

/// Shared setup secret.
#[derive(Clone, Copy)]
struct Trapdoor([u8; 32]);

impl fmt::Debug for Trapdoor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Trapdoor(..)")
    }
}

impl Trapdoor {
    /// $\text{BLAKE2b-512}(\text{"LdpCensus\_Proof\_"},\; td \| name \|
    ///   nonce \| satisfied \| inputs)$
    fn tag(
        &self,
        relation: &str,
        inputs: &PublicInputs,
        nonce: &[u8; NONCE_BYTES],
        satisfied: bool,
    ) -> [u8; TAG_BYTES] {
        let mut state = blake2b_simd::Params::new()
            .hash_length(TAG_BYTES)
            .personal(PROOF_PERSONALIZATION)
            .to_state();
        state.update(&self.0);
        state.update(&u64::try_from(relation.len()).unwrap_or(u64::MAX).to_le_bytes());
        state.update(relation.as_bytes());
        state.update(nonce);
        state.update(&[u8::from(satisfied)]);
        state.update(&inputs.to_bytes());
        *state.finalize().as_array()
    }
}

/// Key used to produce proofs.
#[derive(Clone, Copy, Debug)]
pub struct ProvingKey(Trapdoor);

/// Key used to check proofs.
#[derive(Clone, Copy, Debug)]
pub struct VerifyingKey(Trapdoor);

/// Generate a matching key pair.
pub fn setup(rng: &mut (impl RngCore + CryptoRng)) -> Result<(ProvingKey, VerifyingKey), CryptoError> {
    let mut secret = [0u8; 32];
    rng.try_fill_bytes(&mut secret)
        .map_err(|_err| CryptoError::Initialization)?;
    let trapdoor = Trapdoor(secret);
    Ok((ProvingKey(trapdoor), VerifyingKey(trapdoor)))
}

/// A proof: `nonce || tag`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Proof {
    nonce: [u8; NONCE_BYTES],
    tag: [u8; TAG_BYTES],
}

impl Proof {
    /// Encoded size.
    pub const SIZE: usize = NONCE_BYTES + TAG_BYTES;
}

impl From<Proof> for [u8; Proof::SIZE] {
    fn from(proof: Proof) -> Self {
        let mut out = [0u8; Proof::SIZE];
        let (nonce, tag) = out.split_at_mut(NONCE_BYTES);
        nonce.copy_from_slice(&proof.nonce);
        tag.copy_from_slice(&proof.tag);
        out
    }
}

impl From<&[u8; Proof::SIZE]> for Proof {
    fn from(bytes: &[u8; Proof::SIZE]) -> Self {
        let mut nonce = [0u8; NONCE_BYTES];
        let mut tag = [0u8; TAG_BYTES];
        let (nonce_bytes, tag_bytes) = bytes.split_at(NONCE_BYTES);
        nonce.copy_from_slice(nonce_bytes);
        tag.copy_from_slice(tag_bytes);
        Self { nonce, tag }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Proof {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bytes: [u8; Self::SIZE] = (*self).into();
        BigArray::serialize(&bytes, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Proof {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: [u8; Self::SIZE] = BigArray::deserialize(deserializer)?;
        Ok(Self::from(&bytes))
    }
}

impl ProvingKey {
    /// Prove `R` for a witness that satisfies every clause.
    ///
    /// A failed clause is returned as is and no proof is produced.
    pub fn prove<R: Relation>(
        &self,
        public: &R::Public,
        witness: &R::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Proof, CryptoError> {
        relation::evaluate::<R>(public, witness)?;
        self.seal::<R>(public, true, rng)
    }

    /// Prove `R` without refusing an unsatisfied witness.
    ///
    /// The proof is produced either way; it verifies only if every clause
    /// held.
    pub fn prove_unchecked<R: Relation>(
        &self,
        public: &R::Public,
        witness: &R::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Proof, CryptoError> {
        let recorder = relation::record::<R>(public, witness)?;
        if let Some(failure) = recorder.first_failure() {
            tracing::debug!(
                relation = R::NAME,
                clause = %failure.clause,
                "proving unsatisfied witness"
            );
        }
        self.seal::<R>(public, recorder.is_satisfied(), rng)
    }

    fn seal<R: Relation>(
        &self,
        public: &R::Public,
        satisfied: bool,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Proof, CryptoError> {
        let inputs = R::public_inputs(public)?;
        let mut nonce = [0u8; NONCE_BYTES];
        rng.try_fill_bytes(&mut nonce)
            .map_err(|_err| CryptoError::Initialization)?;
        let tag = self.0.tag(R::NAME, &inputs, &nonce, satisfied);
        tracing::debug!(relation = R::NAME, inputs = inputs.len(), "created proof");
        Ok(Proof { nonce, tag })
    }
}

impl VerifyingKey {
    /// Check `proof` against the public values of `R`.
    pub fn verify<R: Relation>(&self, public: &R::Public, proof: &Proof) -> Result<(), CryptoError> {
        let inputs = R::public_inputs(public)?;
        let expected = self.0.tag(R::NAME, &inputs, &proof.nonce, true);
        if expected == proof.tag {
            tracing::debug!(relation = R::NAME, "proof accepted");
            Ok(())
        } else {
            tracing::debug!(relation = R::NAME, "proof rejected");
            Err(CryptoError::ProofRejected)
        }
    }
}
