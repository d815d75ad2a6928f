//! Error kinds shared by the codec, encryption scheme and relation layers.
//!
//! Primitive-level failures (encoding, decryption, signatures) are returned
//! immediately and abort whatever relation evaluation triggered them. A
//! relation clause that does not hold surfaces as
//! [`CryptoError::ConstraintViolation`] naming the [`Clause`].

#![expect(
    clippy::module_name_repetitions,
    reason = "error kinds are re-exported at the crate root"
)]

use core::fmt;

/// A named clause of a relation predicate.
///
/// Carried by [`CryptoError::ConstraintViolation`] and
/// [`CryptoError::SignatureInvalid`] so callers learn which premise
/// failed without inspecting the witness.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Clause {
    /// `xi = xi_user + xi_census`
    SharedScalarSum,
    /// `cm_xi = H(xi)`
    SharedScalarCommitment,
    /// `cm_xi_user = H(xi_user)`
    UserShareCommitment,
    /// Witness list lengths agree with the public serial number list.
    ListLength,
    /// `sn_old[i] = H(ask[i] || 01 || omega[i])`
    SerialNumber(usize),
    /// `omega` is strictly ascending.
    OmegaOrdering,
    /// `nu_1 = H(omega || 1)`
    PrivateNullifier,
    /// `nu_2 = H(omega || 2)`
    PublicNullifier,
    /// `cm_omega = H(omega)`
    OmegaCommitment,
    /// `signed_data = H(cm_xi_user || nu_1 || xi_census)`
    CensusSignedData,
    /// Census signature over the signed data.
    CensusSignature,
    /// Least significant bit of `xi` equals `c0`.
    FirstCoin,
    /// Second least significant bit of `xi` equals `c1`.
    SecondCoin,
    /// `ldp = RR(c0, c1, id)`
    RandomizedResponse,
    /// `C = [ldp]G + [r]A`
    Ciphertext,
    /// `K = [r]G`
    EphemeralCommitment,
    /// Registration authority signature over `H(apk_list || id)`.
    RegistrationSignature,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::SharedScalarSum => f.write_str("xi = xi_user + xi_census"),
            Self::SharedScalarCommitment => f.write_str("cm_xi = H(xi)"),
            Self::UserShareCommitment => f.write_str("cm_xi_user = H(xi_user)"),
            Self::ListLength => f.write_str("witness list lengths"),
            Self::SerialNumber(index) => write!(f, "sn_old[{index}] = PRF_sn(ask, omega)"),
            Self::OmegaOrdering => f.write_str("omega ascending"),
            Self::PrivateNullifier => f.write_str("nu_1 = H(omega || 1)"),
            Self::PublicNullifier => f.write_str("nu_2 = H(omega || 2)"),
            Self::OmegaCommitment => f.write_str("cm_omega = H(omega)"),
            Self::CensusSignedData => f.write_str("signed_data = H(cm_xi_user || nu_1 || xi_census)"),
            Self::CensusSignature => f.write_str("census signature"),
            Self::FirstCoin => f.write_str("bit 0 of xi = c0"),
            Self::SecondCoin => f.write_str("bit 1 of xi = c1"),
            Self::RandomizedResponse => f.write_str("ldp = RR(c0, c1, id)"),
            Self::Ciphertext => f.write_str("C = [ldp]G + [r]A"),
            Self::EphemeralCommitment => f.write_str("K = [r]G"),
            Self::RegistrationSignature => f.write_str("registration signature"),
        }
    }
}

/// Reasons a value cannot be encoded or decoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EncodingError {
    /// The message integer lies outside `[0, MESSAGE_BOUND)`.
    #[error("message {0} outside the codec range")]
    MessageOutOfRange(u64),
    /// The field element is not a small integer.
    #[error("field element is not a codec message")]
    NotAMessage,
    /// The bytes are not the canonical encoding of a field element.
    #[error("non-canonical field element")]
    NonCanonicalField,
    /// The coordinates or bytes do not describe a point on the curve.
    #[error("point is not on the curve")]
    PointNotOnCurve,
    /// The bytes are not a valid signature or verification key.
    #[error("invalid signature or key encoding")]
    InvalidKey,
}

/// Errors raised by the census relation layer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CryptoError {
    /// The secure random source failed, or yielded a degenerate key.
    #[error("key or seed generation failed")]
    Initialization,

    /// A value could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// The ciphertext does not decode to any message table entry.
    #[error("decryption failed: plaintext not in message table")]
    DecryptionFailed,

    /// A signature did not verify.
    #[error("signature invalid ({clause})")]
    SignatureInvalid {
        /// Clause whose signature check failed.
        clause: Clause,
    },

    /// A relation clause does not hold for the supplied witness.
    #[error("constraint violated: {clause}")]
    ConstraintViolation {
        /// The failed clause.
        clause: Clause,
    },

    /// The proving engine rejected the proof.
    #[error("proof rejected")]
    ProofRejected,
}
