#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

//! cfreg primitives: domain-tagged hashing, fixed-width identities and encodings.
//
// Shared by the registry, the content store and the presentation layer:
//
// - Domain-tagged SHA3-256 with length framing
// - Fixed-width newtypes for principals, locations and salts
// - Fixed-width little-endian integer encodings
// - Constant-time equality for 32-byte digests

use core::fmt;
use core::str::FromStr;

use rand_core::{CryptoRng, RngCore};
use sha3::{Digest, Sha3_256};
use subtle::ConstantTimeEq;
use thiserror::Error;

pub mod constants;

use constants::{ADDRESS_LEN, EFFECTIVE_SALT_LEN, LOCATION_LEN, SUB_SALT_LEN};

/// 32-byte hash (SHA3-256 output).
pub type Hash256 = [u8; 32];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrimitiveError {
    #[error("invalid length: expected {expected} got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// A 160-bit principal identity.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Address(pub [u8; ADDRESS_LEN]);

/// A 160-bit location in a deterministic content store.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Location(pub [u8; LOCATION_LEN]);

/// The caller-chosen 96-bit part of an effective salt.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SubSalt(pub [u8; SUB_SALT_LEN]);

/// Creator identity packed above a sub-salt; see `cfreg_store::effective_salt`.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EffectiveSalt(pub [u8; EFFECTIVE_SALT_LEN]);

impl Address {
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Address of an Ed25519 key: the last 20 bytes of `H("cfreg.address", [pk])`.
    #[must_use]
    pub fn from_verifying_key(pk: &ed25519_dalek::VerifyingKey) -> Self {
        let digest = h_tag(constants::TAG_ADDRESS, &[pk.as_bytes()]);
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(&digest[32 - ADDRESS_LEN..]);
        Self(out)
    }
}

impl Location {
    pub const ZERO: Self = Self([0u8; LOCATION_LEN]);

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Take the low-order 20 bytes of a digest.
    #[must_use]
    pub fn from_digest(digest: &Hash256) -> Self {
        let mut out = [0u8; LOCATION_LEN];
        out.copy_from_slice(&digest[32 - LOCATION_LEN..]);
        Self(out)
    }
}

impl SubSalt {
    /// Sub-salt holding `n` in its low-order bytes (big-endian).
    #[must_use]
    pub fn from_u64(n: u64) -> Self {
        let mut out = [0u8; SUB_SALT_LEN];
        out[SUB_SALT_LEN - 8..].copy_from_slice(&n.to_be_bytes());
        Self(out)
    }

    /// Draw a fresh sub-salt from a cryptographic RNG.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut out = [0u8; SUB_SALT_LEN];
        rng.fill_bytes(&mut out);
        Self(out)
    }
}

macro_rules! impl_fixed_bytes {
    ($t:ty, $len:expr) => {
        impl TryFrom<&[u8]> for $t {
            type Error = PrimitiveError;
            fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
                if b.len() != $len {
                    return Err(PrimitiveError::InvalidLength { expected: $len, got: b.len() });
                }
                let mut arr = [0u8; $len];
                arr.copy_from_slice(b);
                Ok(Self(arr))
            }
        }

        impl AsRef<[u8]> for $t {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self, f)
            }
        }

        impl FromStr for $t {
            type Err = PrimitiveError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s.strip_prefix("0x").unwrap_or(s);
                let bytes = hex::decode(digits)?;
                Self::try_from(bytes.as_slice())
            }
        }
    };
}
impl_fixed_bytes!(Address, ADDRESS_LEN);
impl_fixed_bytes!(Location, LOCATION_LEN);
impl_fixed_bytes!(SubSalt, SUB_SALT_LEN);
impl_fixed_bytes!(EffectiveSalt, EFFECTIVE_SALT_LEN);

/// Convert an unsigned integer to fixed-width little-endian bytes.
///
/// The output is exactly `W` bytes (no overlong encodings).
#[must_use]
pub fn le_bytes<const W: usize>(mut x: u128) -> [u8; W] {
    let mut out = [0u8; W];
    let mut i = 0usize;
    while i < W {
        out[i] = (x & 0xFF) as u8;
        x >>= 8;
        i += 1;
    }
    out
}

/// Read a `u64` from the first 8 bytes of a little-endian byte slice.
#[must_use]
pub fn u64_from_le(b: &[u8]) -> u64 {
    let mut x: u64 = 0;
    let mut i = 0usize;
    while i < 8 && i < b.len() {
        x |= u64::from(b[i]) << (8 * i as u64);
        i += 1;
    }
    x
}

/// Domain-tagged SHA3-256 with length framing:
/// `H(tag_ascii, parts[])` = `SHA3_256`( UTF8(tag) || Σ ( LE(|p|,8) || p ) )
#[must_use]
pub fn h_tag(tag: &str, parts: &[&[u8]]) -> Hash256 {
    debug_assert!(
        tag.starts_with("cfreg."),
        "non-cfreg.* tag used in protocol hashing: {tag}"
    );
    let mut hasher = Sha3_256::new();
    hasher.update(tag.as_bytes());
    for p in parts {
        let len_le = le_bytes::<8>(p.len() as u128);
        hasher.update(len_le);
        hasher.update(p);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Digest of raw content bytes, the input to location derivation.
#[must_use]
pub fn content_digest(content: &[u8]) -> Hash256 {
    h_tag(constants::TAG_CONTENT, &[content])
}

/// `commitment = H("cfreg.commitment", [location, creator])`
#[must_use]
pub fn commitment_hash(location: &Location, creator: &Address) -> Hash256 {
    h_tag(constants::TAG_COMMITMENT, &[&location.0, &creator.0])
}

/// Constant-time equality for two 32-byte hashes.
#[must_use]
pub fn ct_eq_hash(a: &Hash256, b: &Hash256) -> bool {
    a.ct_eq(b).into()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commitment_binds_creator() {
        let loc = Location([7u8; 20]);
        let a = commitment_hash(&loc, &Address([1u8; 20]));
        let b = commitment_hash(&loc, &Address([2u8; 20]));
        assert!(!ct_eq_hash(&a, &b));
        assert!(ct_eq_hash(&a, &commitment_hash(&loc, &Address([1u8; 20]))));
    }

    #[test]
    fn length_framing_separates_parts() {
        let ab_c = h_tag(constants::TAG_CONTENT, &[b"ab", b"c"]);
        let a_bc = h_tag(constants::TAG_CONTENT, &[b"a", b"bc"]);
        assert_ne!(ab_c, a_bc);
    }

    #[test]
    fn address_parses_with_and_without_prefix() {
        let hex40 = "00112233445566778899aabbccddeeff00112233";
        let a: Address = hex40.parse().unwrap();
        let b: Address = format!("0x{hex40}").parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), format!("0x{hex40}"));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = Location::try_from(&[0u8; 19][..]).unwrap_err();
        assert_eq!(err, PrimitiveError::InvalidLength { expected: 20, got: 19 });
        assert!("0x1234".parse::<Address>().is_err());
        assert!("zz".parse::<SubSalt>().is_err());
    }

    #[test]
    fn bad_hex_reports_hex_error() {
        let err = "0xzz".parse::<Location>().unwrap_err();
        assert!(matches!(err, PrimitiveError::InvalidHex(_)));
        assert_ne!(err, PrimitiveError::InvalidLength { expected: 20, got: 0 });
    }

    #[test]
    fn random_sub_salts_differ() {
        let mut rng = rand_core::OsRng;
        assert_ne!(SubSalt::random(&mut rng), SubSalt::random(&mut rng));
    }

    #[test]
    fn sub_salt_from_u64_is_big_endian_low_bytes() {
        let s = SubSalt::from_u64(0x0102);
        assert_eq!(s.0[..10], [0u8; 10]);
        assert_eq!(s.0[10..], [0x01, 0x02]);
        assert_eq!(SubSalt::from_u64(0), SubSalt::default());
    }

    #[test]
    fn le_roundtrip_u64() {
        let x = 0x0102_0304_0506_0708u64;
        assert_eq!(u64_from_le(&le_bytes::<8>(u128::from(x))), x);
    }

    #[test]
    fn location_from_digest_takes_low_bytes() {
        let mut d = [0u8; 32];
        d[12] = 0xAA;
        d[31] = 0xBB;
        let loc = Location::from_digest(&d);
        assert_eq!(loc.0[0], 0xAA);
        assert_eq!(loc.0[19], 0xBB);
    }
}
