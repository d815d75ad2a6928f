//! # ldp_census
//!
//! The cryptographic relation layer of a privacy-preserving census.
//!
//! A respondent answers a yes/no question. The answer is first perturbed by
//! two-coin randomized response (local differential privacy), then
//! ElGamal-encrypted to the census authority over Pallas. A zero-knowledge
//! statement ties the submission to the respondent's registration and to a
//! shared blinding scalar $\xi$ established once per respondent.
//!
//! ## Protocol flow
//!
//! 1. **Tag establishment** ([`TagEstablishment`]): the respondent commits to
//!    $\xi_{user}$ and spends prior coins. The census authority contributes a
//!    signed $\xi_{census}$. The relation proves
//!    $\xi = \xi_{user} + \xi_{census}$ and publishes $cm_\xi = H(\xi)$.
//! 2. **Response submission** ([`ResponseSubmission`]): the respondent derives
//!    coins from $\xi$, computes the randomized response, encrypts it and
//!    proves the whole chain against $cm_\xi$ and a registration signature.
//! 3. **Decryption**: the census authority opens the ciphertext with
//!    [`CensusAuthority::open`] and a [`MessageTable`] lookup.
//!
//! ## Relations and proofs
//!
//! Relations are written once against [`relation::Driver`] and run under a
//! strict evaluator or a recording driver. [`proof`] wraps them behind a
//! prover/verifier interface.
//!
//! ## Encoding
//!
//! Field elements and point coordinates cross the wire as 32-byte
//! big-endian integers. See [`primitives::encoding`].
//!
//! ## Features
//!
//! - `std` (default): forwards to `blake2b_simd/std` and `tracing/std`. It
//!   gates no item of this crate, which links `std` either way through
//!   `halo2_gadgets`, `lazy_static` and `thiserror`.
//! - `serde`: `Serialize`/`Deserialize` for signatures, ciphertexts and
//!   proofs.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::pub_use, reason = "exporting items for consumers")]

extern crate alloc;

pub mod authority;
pub mod codec;
pub mod commitment;
pub mod constants;
pub mod elgamal;
pub mod error;
pub mod keys;
pub mod ldp;
pub mod primitives;
pub mod proof;
pub mod relation;

pub use authority::{CensusAuthority, CensusShare, Registration, RegistrationAuthority};
pub use codec::{Message, MessageTable};
pub use elgamal::{Ciphertext, EphemeralSecret, decrypt, encrypt};
pub use error::{Clause, CryptoError, EncodingError};
pub use ldp::{Coins, randomized_response};
pub use primitives::{Fp, Fq, Point};
pub use proof::Proof;
pub use relation::{Relation, ResponseSubmission, TagEstablishment};
