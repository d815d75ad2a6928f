//! Census relations.
//!
//! A relation is a predicate over public inputs and a private witness,
//! written once against the [`Driver`] capability interface and evaluated
//! by whichever driver the caller supplies:
//!
//! - **[`Evaluator`]**: strict. Stops at the first clause that does not
//!   hold and returns [`CryptoError::ConstraintViolation`] (or
//!   [`CryptoError::SignatureInvalid`]) naming it.
//! - **[`Recorder`]**: records every [`Assertion`] with its outcome and
//!   never stops on a failed clause. Used by the proving engine and by
//!   diagnostics.
//!
//! Two relations are defined:
//!
//! | Relation | Establishes |
//! | -------- | ----------- |
//! | [`TagEstablishment`] | the shared blinding scalar $\xi$ and the anti-replay nullifiers over prior commitments |
//! | [`ResponseSubmission`] | that the ciphertext encrypts the randomized response of a registered member's `id` under coins drawn from $\xi$ |
//!
//! ## Public inputs
//!
//! Each relation flattens its public values into a [`PublicInputs`]
//! vector of relation-field elements in a fixed order. Points contribute
//! their affine `(x, y)` pair. This vector is all a verifier of the
//! external proof sees.
//!
//! Encoding errors met while lifting values between fields or decoding
//! keys are primitive failures: they abort evaluation under every driver.

use bitvec::{array::BitArray, order::Lsb0};
use ff::PrimeField as _;
use group::Curve as _;
use pasta_curves::pallas;

use crate::{
    commitment::commit,
    error::{Clause, CryptoError},
    keys::{Signature, VerificationKey},
    primitives::{
        Fp, Fq, Point, coordinates,
        encoding::{FIELD_BYTES, fp_to_bytes},
    },
};

pub mod response;
pub mod tag;

pub use response::ResponseSubmission;
pub use tag::TagEstablishment;

/// The little-endian bit decomposition of a relation-field element.
pub type Bits = BitArray<[u8; FIELD_BYTES], Lsb0>;

/// A value an assertion compares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Term {
    /// A relation-field element.
    Field(Fp),
    /// A curve point.
    Point(Point),
}

impl From<Fp> for Term {
    fn from(value: Fp) -> Self {
        Self::Field(value)
    }
}

impl From<Point> for Term {
    fn from(point: Point) -> Self {
        Self::Point(point)
    }
}

/// What an assertion checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[expect(
    variant_size_differences,
    reason = "assertions are recorded once per clause"
)]
pub enum Check {
    /// `lhs == rhs`
    Equal {
        /// Value computed from the witness.
        lhs: Term,
        /// Value it must match.
        rhs: Term,
    },
    /// A sequence of `len` elements is strictly ascending.
    Ascending {
        /// Sequence length.
        len: usize,
    },
    /// A signature verifies.
    Signature,
}

/// One typed assertion and whether it held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assertion {
    /// The relation clause it belongs to.
    pub clause: Clause,
    /// What was checked.
    pub check: Check,
    /// Outcome.
    pub holds: bool,
}

impl Assertion {
    /// The error a failed assertion surfaces as.
    #[must_use]
    pub const fn error(&self) -> CryptoError {
        match self.check {
            Check::Signature => CryptoError::SignatureInvalid {
                clause: self.clause,
            },
            Check::Equal { .. } | Check::Ascending { .. } => CryptoError::ConstraintViolation {
                clause: self.clause,
            },
        }
    }
}

/// Capability interface a relation is written against.
///
/// Arithmetic is native and shared by every driver; drivers differ only in
/// what [`record`](Self::record) does with an assertion.
pub trait Driver {
    /// Handle one assertion. Strict drivers fail on `holds == false`.
    fn record(&mut self, assertion: Assertion) -> Result<(), CryptoError>;

    /// The commitment hash over `inputs`.
    fn hash(&mut self, inputs: &[Fp]) -> Fp {
        commit(inputs)
    }

    /// `[scalar] point`
    fn scalar_mul(&mut self, scalar: &Fq, point: &Point) -> Point {
        (point * scalar).to_affine()
    }

    /// `lhs + rhs`
    fn add(&mut self, lhs: &Point, rhs: &Point) -> Point {
        (pallas::Point::from(*lhs) + rhs).to_affine()
    }

    /// Little-endian bit decomposition of the canonical integer.
    fn to_bits(&mut self, value: &Fp) -> Bits {
        BitArray::new(value.to_repr())
    }

    /// Assert `lhs == rhs` for `clause`.
    fn assert_equal(
        &mut self,
        clause: Clause,
        lhs: impl Into<Term>,
        rhs: impl Into<Term>,
    ) -> Result<(), CryptoError> {
        let (left, right) = (lhs.into(), rhs.into());
        self.record(Assertion {
            clause,
            check: Check::Equal {
                lhs: left,
                rhs: right,
            },
            holds: left == right,
        })
    }

    /// Assert `values` is strictly ascending by canonical integer value.
    fn assert_ascending(&mut self, clause: Clause, values: &[Fp]) -> Result<(), CryptoError> {
        let holds = values
            .windows(2)
            .all(|pair| matches!(*pair, [lo, hi] if fp_to_bytes(&lo) < fp_to_bytes(&hi)));
        self.record(Assertion {
            clause,
            check: Check::Ascending { len: values.len() },
            holds,
        })
    }

    /// Assert `sig` is a valid signature on `msg` under `vk`.
    fn verify_signature(
        &mut self,
        clause: Clause,
        vk: &VerificationKey,
        msg: &Fp,
        sig: &Signature,
    ) -> Result<(), CryptoError> {
        self.record(Assertion {
            clause,
            check: Check::Signature,
            holds: vk.verify(msg, sig).is_ok(),
        })
    }
}

/// Strict, fail-fast driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct Evaluator {
    checked: usize,
}

impl Evaluator {
    /// Number of assertions that held so far.
    #[must_use]
    pub const fn checked(&self) -> usize {
        self.checked
    }
}

impl Driver for Evaluator {
    fn record(&mut self, assertion: Assertion) -> Result<(), CryptoError> {
        if assertion.holds {
            self.checked += 1;
            Ok(())
        } else {
            tracing::debug!(clause = %assertion.clause, "relation clause failed");
            Err(assertion.error())
        }
    }
}

/// Driver that records every assertion.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    assertions: Vec<Assertion>,
}

impl Recorder {
    /// All assertions in evaluation order.
    #[must_use]
    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    /// The first failed assertion, if any.
    #[must_use]
    pub fn first_failure(&self) -> Option<&Assertion> {
        self.assertions.iter().find(|assertion| !assertion.holds)
    }

    /// Whether every recorded assertion held.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.first_failure().is_none()
    }
}

impl Driver for Recorder {
    fn record(&mut self, assertion: Assertion) -> Result<(), CryptoError> {
        tracing::trace!(clause = %assertion.clause, holds = assertion.holds, "recorded assertion");
        self.assertions.push(assertion);
        Ok(())
    }
}

/// The ordered public-input vector of one relation instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublicInputs(Vec<Fp>);

impl PublicInputs {
    /// Append a field element.
    pub fn push_field(&mut self, value: impl Into<Fp>) {
        self.0.push(value.into());
    }

    /// Append a point as `(x, y)`.
    pub fn push_point(&mut self, point: &Point) {
        let (x, y) = coordinates(point);
        self.0.push(x);
        self.0.push(y);
    }

    /// The elements in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Fp] {
        &self.0
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenated 32-byte big-endian encodings.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(fp_to_bytes).collect()
    }
}

impl From<Vec<Fp>> for PublicInputs {
    fn from(elements: Vec<Fp>) -> Self {
        Self(elements)
    }
}

/// A relation predicate.
pub trait Relation {
    /// Name bound into proofs so a proof for one relation never verifies
    /// as another.
    const NAME: &'static str;

    /// Public inputs.
    type Public;

    /// Private witness.
    type Witness;

    /// Flatten the public values.
    fn public_inputs(public: &Self::Public) -> Result<PublicInputs, CryptoError>;

    /// Emit every clause of the predicate into `dr`.
    fn synthesize<D: Driver>(
        dr: &mut D,
        public: &Self::Public,
        witness: &Self::Witness,
    ) -> Result<(), CryptoError>;
}

/// Evaluate `R` strictly: `Ok` iff every clause holds.
pub fn evaluate<R: Relation>(public: &R::Public, witness: &R::Witness) -> Result<(), CryptoError> {
    let mut dr = Evaluator::default();
    R::synthesize(&mut dr, public, witness)?;
    tracing::debug!(relation = R::NAME, assertions = dr.checked(), "relation satisfied");
    Ok(())
}

/// Evaluate `R` recording every assertion.
///
/// Only primitive failures (encoding) are returned as errors; failed
/// clauses are left in the [`Recorder`].
pub fn record<R: Relation>(
    public: &R::Public,
    witness: &R::Witness,
) -> Result<Recorder, CryptoError> {
    let mut dr = Recorder::default();
    R::synthesize(&mut dr, public, witness)?;
    Ok(dr)
}
