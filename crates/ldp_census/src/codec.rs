//! Discrete-log message codec.
//!
//! Small integers embed into the group as $M = [m]\,\mathcal{G}$. Decoding
//! inverts the embedding by lookup in a precomputed [`MessageTable`]
//! covering $[0, N)$ with $N =$ [`MESSAGE_BOUND`].
//!
//! The range starts at 0, not 1: message 0 embeds as the identity and is
//! the report produced under coins $(1, 1)$, so it must decode.
//!
//! The table is an explicit immutable value. Callers either build their own
//! with [`MessageTable::new`] and pass it by reference, or borrow the
//! process-wide instance from [`MessageTable::shared`], which is built
//! exactly once even under concurrent first use.
//!
//! A point absent from the table is a [`CryptoError::DecryptionFailed`],
//! never a default message.

use alloc::collections::BTreeMap;

use ff::PrimeField as _;
use group::{Curve as _, Group as _, GroupEncoding as _};
use lazy_static::lazy_static;
use pasta_curves::pallas;

use crate::{
    constants::MESSAGE_BOUND,
    error::{CryptoError, EncodingError},
    primitives::{Fp, Fq, Point, base},
};

/// A plaintext the codec can decode: an integer in `[0, MESSAGE_BOUND)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Message(u64);

impl Message {
    /// The integer value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The message as a relation-field element.
    #[must_use]
    pub fn to_field(self) -> Fp {
        Fp::from(self.0)
    }

    /// The message as a curve scalar.
    #[must_use]
    pub fn to_scalar(self) -> Fq {
        Fq::from(self.0)
    }
}

impl TryFrom<u64> for Message {
    type Error = EncodingError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value < MESSAGE_BOUND {
            Ok(Self(value))
        } else {
            Err(EncodingError::MessageOutOfRange(value))
        }
    }
}

impl TryFrom<Fp> for Message {
    type Error = EncodingError;

    /// Accepts field elements whose canonical integer fits in `u64` and lies
    /// in the codec range.
    fn try_from(value: Fp) -> Result<Self, Self::Error> {
        let repr = value.to_repr();
        let (low, high) = repr.split_at(8);
        if high.iter().any(|byte| *byte != 0) {
            return Err(EncodingError::NotAMessage);
        }
        let low_bytes: [u8; 8] = low.try_into().map_err(|_len| EncodingError::NotAMessage)?;
        Self::try_from(u64::from_le_bytes(low_bytes))
    }
}

impl From<Message> for Fp {
    fn from(msg: Message) -> Self {
        msg.to_field()
    }
}

/// Embed a scalar: $[m]\,\mathcal{G}$. Total; only messages inside the
/// codec range can be decoded again.
#[must_use]
pub fn encode(message: &Fq) -> Point {
    (base() * message).to_affine()
}

/// Lookup table from embedded points back to messages.
#[derive(Clone, Debug)]
pub struct MessageTable {
    entries: BTreeMap<[u8; 32], Message>,
}

lazy_static! {
    static ref SHARED: MessageTable = MessageTable::new();
}

impl MessageTable {
    /// Build the table for every message in `[0, MESSAGE_BOUND)`.
    ///
    /// Walks $0, \mathcal{G}, 2\mathcal{G}, \ldots$ by repeated addition;
    /// deterministic, so independently built tables are equal.
    #[must_use]
    pub fn new() -> Self {
        let step = pallas::Point::from(base());
        let mut acc = pallas::Point::identity();
        let mut entries = BTreeMap::new();
        for value in 0..MESSAGE_BOUND {
            entries.insert(acc.to_affine().to_bytes(), Message(value));
            acc += step;
        }
        tracing::debug!(entries = entries.len(), "built discrete-log message table");
        Self { entries }
    }

    /// The process-wide table, built on first use.
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// Number of decodable messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty (never true for a built table).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recover the message embedded in `point`.
    pub fn decode(&self, point: &Point) -> Result<Message, CryptoError> {
        self.entries
            .get(&point.to_bytes())
            .copied()
            .ok_or(CryptoError::DecryptionFailed)
    }
}

impl Default for MessageTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use core::{iter, ptr};
    use std::thread;

    use ff::Field as _;
    use group::prime::PrimeCurveAffine as _;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn table_covers_range() {
        let table = MessageTable::new();
        assert_eq!(table.len(), usize::try_from(MESSAGE_BOUND).unwrap());
        for value in 0..MESSAGE_BOUND {
            let point = encode(&Fq::from(value));
            assert_eq!(table.decode(&point).unwrap().value(), value);
        }
    }

    #[test]
    fn zero_is_the_identity() {
        assert_eq!(encode(&Fq::ZERO), Point::identity());
        assert_eq!(
            MessageTable::shared().decode(&Point::identity()).unwrap(),
            Message::try_from(0u64).unwrap()
        );
    }

    #[test]
    fn out_of_range_point_fails_to_decode() {
        let point = encode(&Fq::from(MESSAGE_BOUND));
        assert_eq!(
            MessageTable::shared().decode(&point),
            Err(CryptoError::DecryptionFailed)
        );
    }

    #[test]
    fn shared_table_is_built_once() {
        let first = MessageTable::shared();
        let handles: Vec<_> = iter::repeat_with(|| thread::spawn(MessageTable::shared))
            .take(4)
            .collect();
        for handle in handles {
            assert!(
                ptr::eq(handle.join().unwrap(), first),
                "every thread sees the same table"
            );
        }
    }

    #[test]
    fn independently_built_tables_agree() {
        let table = MessageTable::new();
        let point = encode(&Fq::from(42u64));
        assert_eq!(table.decode(&point), MessageTable::shared().decode(&point));
    }

    #[test]
    fn message_range_is_enforced() {
        Message::try_from(MESSAGE_BOUND - 1).unwrap();
        assert_eq!(
            Message::try_from(MESSAGE_BOUND),
            Err(EncodingError::MessageOutOfRange(MESSAGE_BOUND))
        );
        assert_eq!(Message::try_from(-Fp::ONE), Err(EncodingError::NotAMessage));
    }

    proptest! {
        #[test]
        fn field_messages_round_trip(value in 0..MESSAGE_BOUND) {
            let msg = Message::try_from(Fp::from(value)).unwrap();
            prop_assert_eq!(msg.value(), value);
            prop_assert_eq!(Fp::from(msg), Fp::from(value));
        }
    }
}
