//! ## Key Hierarchy
//!
//! Each party holds a single 32-byte [`Seed`]. Every private key is a
//! domain-separated expansion of it, so one seed backs one party's whole
//! key set.
//!
//! ```mermaid
//! flowchart TB
//!     seed[Seed]
//!     sk[SigningKey]
//!     vk[VerificationKey]
//!     a[DecryptionKey a]
//!     A[EncryptionKey A]
//!     ask[AddressKey ask]
//!     apk[AddressPublicKey apk]
//!     seed --> sk & a & ask
//!     sk --> vk
//!     a --> A
//!     ask --> apk
//! ```
//!
//! ### Private keys ([`private`])
//!
//! - `sk`: authority signing key (census authority, registration authority)
//! - `a`: census decryption key
//!
//! ### Public keys ([`public`])
//!
//! - `vk = [sk]G_auth`: verifies authority signatures
//! - `A = [a]G`: census encryption key
//!
//! ### Address keys ([`commitment`](crate::commitment))
//!
//! - `ask`: owns prior commitments, derives serial numbers
//! - `apk = H(ask || 0)`: entry of the registered member list
//!
//! Signing keys are RedPallas keys and therefore sign-normalized: the
//! derivation negates `sk` when needed so `vk` has $\tilde{y} = 0$.

pub mod private;
pub mod public;

mod signature;

// Re-exports: public API surface.
pub use private::{DecryptionKey, Seed, SigningKey};
pub use public::{EncryptionKey, VerificationKey};
pub use signature::Signature;
