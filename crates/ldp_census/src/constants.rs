//! Protocol-wide domain separators, personalizations and parameters.
//!
//! All BLAKE2b personalizations are exactly 16 bytes (the BLAKE2b
//! personal field width). Hash-to-curve domains are variable-length strings
//! under the `ldp-census:` namespace.

/// BLAKE2b-512 personalization for `PRF^expand`: key expansion from a
/// 32-byte seed to the authority and census private scalars.
pub const PRF_EXPAND_PERSONALIZATION: &[u8; 16] = b"LdpCensus_Expand";

/// BLAKE2b-512 personalization for the mock proving engine transcript.
pub const PROOF_PERSONALIZATION: &[u8; 16] = b"LdpCensus_Proof_";

/// Hash-to-curve domain for the ElGamal base point.
///
/// The base point is `hash_to_curve(ELGAMAL_DOMAIN)(b"G")`, a
/// nothing-up-my-sleeve Pallas generator used for message embedding,
/// key derivation and the ephemeral commitment `K`.
pub const ELGAMAL_DOMAIN: &str = "ldp-census:ElGamal";

/// Exclusive upper bound of the messages the discrete-log codec can
/// decode. The table covers `[0, MESSAGE_BOUND)`.
pub const MESSAGE_BOUND: u64 = 100;

/// PRF tag for address public keys: `a_pk = H(a_sk || 0b00)`.
pub const ADDRESS_TAG: u64 = 0b00;

/// PRF tag for serial numbers: `sn = H(a_sk || 0b01 || rho)`.
pub const SERIAL_NUMBER_TAG: u64 = 0b01;

/// Trailing index of the private nullifier `nu_1 = H(omega || 1)`.
pub const NULLIFIER_ONE: u64 = 1;

/// Trailing index of the public nullifier `nu_2 = H(omega || 2)`.
pub const NULLIFIER_TWO: u64 = 2;

/// Domain-separated key expansion from a seed.
///
/// `PRF^expand_seed(t) = BLAKE2b-512("LdpCensus_Expand", seed || t)`
///
/// A struct with a single-byte domain separator and associated constants
/// for each derived key.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PrfExpand {
    domain_separator: u8,
}

impl PrfExpand {
    /// `[0x01]` -> authority signing key (RedPallas, scalar field)
    pub(crate) const SIGNING: Self = Self {
        domain_separator: 0x01,
    };
    /// `[0x02]` -> census decryption key (ElGamal, scalar field)
    pub(crate) const DECRYPTION: Self = Self {
        domain_separator: 0x02,
    };
    /// `[0x03]` -> address secret key (base field)
    pub(crate) const ADDRESS: Self = Self {
        domain_separator: 0x03,
    };

    /// Evaluate the PRF: `BLAKE2b-512("LdpCensus_Expand", seed || domain_sep)`.
    ///
    /// Returns 64 bytes suitable for unbiased reduction into either field
    /// via `FromUniformBytes`.
    pub(crate) fn with(self, seed: &[u8; 32]) -> [u8; 64] {
        *blake2b_simd::Params::new()
            .hash_length(64)
            .personal(PRF_EXPAND_PERSONALIZATION)
            .to_state()
            .update(seed)
            .update(&[self.domain_separator])
            .finalize()
            .as_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Same seed, different domain separators -> different outputs.
    #[test]
    fn prf_expand_domain_separators_independent() {
        let seed = [0x42u8; 32];
        let signing = PrfExpand::SIGNING.with(&seed);
        let decryption = PrfExpand::DECRYPTION.with(&seed);
        let address = PrfExpand::ADDRESS.with(&seed);
        assert_ne!(signing, decryption);
        assert_ne!(signing, address);
        assert_ne!(decryption, address);
    }

    #[test]
    fn prf_tags_are_distinct() {
        assert_ne!(ADDRESS_TAG, SERIAL_NUMBER_TAG);
        assert_ne!(NULLIFIER_ONE, NULLIFIER_TWO);
    }
}
