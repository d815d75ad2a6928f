//! Two-coin randomized response.
//!
//! The respondent's blinding scalar $\xi$ supplies two coins: $c_0$ is the
//! least significant bit of $\xi$'s canonical integer and $c_1$ the next
//! bit. The report is
//!
//! | $c_0$ | $c_1$ | report |
//! | ----- | ----- | ------ |
//! | 0     | any   | the secret `id` |
//! | 1     | 0     | 1 |
//! | 1     | 1     | 0 |
//!
//! With uniform coins the truth is reported with probability 3/4 over the
//! binary collapse "id is 1 / id is not 1", giving $\varepsilon = \ln 3$.
//!
//! Coins are read two ways: [`Coins::extract`] reads the final byte of the
//! big-endian wire encoding, [`Coins::from_bits`] reads bits 0 and 1 of the
//! [`Driver::to_bits`](crate::relation::Driver::to_bits) decomposition that
//! the relation constrains. Tests pin the two views to each other.

use ff::Field as _;

use crate::{
    primitives::{Fp, encoding::fp_to_bytes},
    relation::Bits,
};

/// The coin pair $(c_0, c_1)$.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Coins {
    /// First coin: report the truth when `false`.
    pub c0: bool,
    /// Second coin: decoy is `1` when `false`, `0` when `true`.
    pub c1: bool,
}

impl Coins {
    /// Read the coins from the last byte of `rho`'s big-endian encoding.
    #[must_use]
    pub fn extract(rho: &Fp) -> Self {
        let [.., last] = fp_to_bytes(rho);
        Self {
            c0: last & 0b01 != 0,
            c1: last & 0b10 != 0,
        }
    }

    /// Read the coins from bits 0 and 1 of a little-endian decomposition.
    #[must_use]
    pub fn from_bits(bits: &Bits) -> Self {
        Self {
            c0: bits.get(0).is_some_and(|bit| *bit),
            c1: bits.get(1).is_some_and(|bit| *bit),
        }
    }

    /// The coins as relation-field bits.
    #[must_use]
    pub fn to_field(self) -> (Fp, Fp) {
        (Fp::from(u64::from(self.c0)), Fp::from(u64::from(self.c1)))
    }
}

/// Apply the randomized-response table to `secret`.
#[must_use]
pub fn respond(coins: Coins, secret: Fp) -> Fp {
    match (coins.c0, coins.c1) {
        (false, _) => secret,
        (true, false) => Fp::ONE,
        (true, true) => Fp::ZERO,
    }
}

/// Derive the coins from `rho` and perturb `secret` with them.
#[must_use]
pub fn randomized_response(rho: &Fp, secret: Fp) -> (Fp, Coins) {
    let coins = Coins::extract(rho);
    (respond(coins, secret), coins)
}
