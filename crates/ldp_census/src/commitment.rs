//! Commitments, serial numbers, nullifiers and address keys.
//!
//! Every value here is a single relation-field element produced by one
//! hash, the chained Poseidon commitment over a sequence of inputs:
//!
//! $$h_0 = n,\qquad h_i = \text{Poseidon}(h_{i-1}, x_i),\qquad
//!   \text{commit}(x_1, \ldots, x_n) = h_n$$
//!
//! Seeding the chain with the length $n$ binds the input count, so
//! `commit([a, b])` and `commit([a, b, 0])` differ. The chain is
//! order-sensitive.
//!
//! ## PRF family
//!
//! | Output | Inputs |
//! | ------ | ------ |
//! | address public key $a_{pk}$ | $(a_{sk}, 0)$ |
//! | serial number $sn$ | $(a_{sk}, 1, \rho)$ |
//! | nullifier $\nu_j$ | $(\omega_1, \ldots, \omega_k, j)$ for $j \in \{1, 2\}$ |
//!
//! $\nu_1$ stays private and is bound into the census authority's signed
//! data; $\nu_2$ is published so a second tag over the same $\omega$ is
//! detected.

use ff::FromUniformBytes as _;
use halo2_gadgets::poseidon::primitives::{self as poseidon, ConstantLength, P128Pow5T3};

use crate::{
    constants::{ADDRESS_TAG, NULLIFIER_ONE, NULLIFIER_TWO, PrfExpand, SERIAL_NUMBER_TAG},
    primitives::Fp,
};

/// One Poseidon compression: width 3, rate 2.
#[must_use]
pub fn compress(left: Fp, right: Fp) -> Fp {
    poseidon::Hash::<_, P128Pow5T3, ConstantLength<2>, 3, 2>::init().hash([left, right])
}

/// The chained commitment over `inputs`.
#[must_use]
pub fn commit(inputs: &[Fp]) -> Fp {
    let len = u64::try_from(inputs.len()).unwrap_or(u64::MAX);
    inputs
        .iter()
        .fold(Fp::from(len), |acc, input| compress(acc, *input))
}

// =============================================================================
// Commitment
// =============================================================================

/// A commitment to a sequence of relation-field elements.
///
/// Used for $cm_\xi$, $cm_{\xi_{user}}$ and $cm_\omega$.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Commitment(Fp);

impl Commitment {
    /// Commit to `inputs`.
    #[must_use]
    pub fn of(inputs: &[Fp]) -> Self {
        Self(commit(inputs))
    }
}

impl From<Fp> for Commitment {
    fn from(value: Fp) -> Self {
        Self(value)
    }
}

impl From<Commitment> for Fp {
    fn from(cm: Commitment) -> Self {
        cm.0
    }
}

// =============================================================================
// Serial number
// =============================================================================

/// A serial number $sn = \text{commit}(a_{sk}, 1, \rho)$ marking one prior
/// commitment as consumed by a tag establishment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SerialNumber(Fp);

impl SerialNumber {
    /// Derive the serial number of `rho` under the address secret `ask`.
    #[must_use]
    pub fn derive(ask: &AddressKey, rho: Fp) -> Self {
        Self(commit(&[ask.0, Fp::from(SERIAL_NUMBER_TAG), rho]))
    }
}

impl From<Fp> for SerialNumber {
    fn from(value: Fp) -> Self {
        Self(value)
    }
}

impl From<SerialNumber> for Fp {
    fn from(sn: SerialNumber) -> Self {
        sn.0
    }
}

// =============================================================================
// Nullifier
// =============================================================================

/// Which of the two tag nullifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NullifierIndex {
    /// $\nu_1$, private; signed by the census authority.
    Private,
    /// $\nu_2$, public; detects double tag establishment.
    Public,
}

impl NullifierIndex {
    /// The trailing PRF input for this index.
    #[must_use]
    pub fn to_field(self) -> Fp {
        match self {
            Self::Private => Fp::from(NULLIFIER_ONE),
            Self::Public => Fp::from(NULLIFIER_TWO),
        }
    }
}

/// A tag nullifier $\nu_j = \text{commit}(\omega_1, \ldots, \omega_k, j)$.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nullifier(Fp);

impl Nullifier {
    /// Derive the nullifier of `omega` at `index`.
    #[must_use]
    pub fn derive(omega: &[Fp], index: NullifierIndex) -> Self {
        let mut inputs = Vec::with_capacity(omega.len() + 1);
        inputs.extend_from_slice(omega);
        inputs.push(index.to_field());
        Self(commit(&inputs))
    }
}

impl From<Fp> for Nullifier {
    fn from(value: Fp) -> Self {
        Self(value)
    }
}

impl From<Nullifier> for Fp {
    fn from(nf: Nullifier) -> Self {
        nf.0
    }
}

// =============================================================================
// Address keys
// =============================================================================

/// An address secret key $a_{sk}$.
///
/// Owns one or more prior commitments; its serial numbers prove their
/// consumption.
#[derive(Clone, Copy, Debug)]
pub struct AddressKey(Fp);

impl AddressKey {
    /// Derive $a_{sk}$ from a 32-byte seed.
    ///
    /// `ask = ToBase(PRF^expand_seed([0x03]))`
    #[must_use]
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self(Fp::from_uniform_bytes(&PrfExpand::ADDRESS.with(seed)))
    }

    /// The address public key $a_{pk} = \text{commit}(a_{sk}, 0)$.
    #[must_use]
    pub fn public(&self) -> AddressPublicKey {
        AddressPublicKey(commit(&[self.0, Fp::from(ADDRESS_TAG)]))
    }

    /// The secret as a relation witness.
    #[must_use]
    pub const fn inner(&self) -> Fp {
        self.0
    }
}

impl From<Fp> for AddressKey {
    fn from(value: Fp) -> Self {
        Self(value)
    }
}

/// An address public key $a_{pk}$, one entry of the member list the
/// registration authority signs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressPublicKey(Fp);

impl From<Fp> for AddressPublicKey {
    fn from(value: Fp) -> Self {
        Self(value)
    }
}

impl From<AddressPublicKey> for Fp {
    fn from(apk: AddressPublicKey) -> Self {
        apk.0
    }
}
