use cfreg_primitives::{constants::DEFAULT_MIN_REVEAL_DELAY_SECS, Address};
use serde::{Deserialize, Deserializer};

use crate::errors::ConfigError;

/// Registry policy.
///
/// ```toml
/// min_reveal_delay_secs = 120
/// store_id = "0x5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a"
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Minimum age of a commitment before it may be revealed (inclusive).
    pub min_reveal_delay_secs: u64,
    /// Identity of the content store; mixed into every predicted location.
    #[serde(deserialize_with = "de_address")]
    pub store_id: Address,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            min_reveal_delay_secs: DEFAULT_MIN_REVEAL_DELAY_SECS,
            store_id: Address::ZERO,
        }
    }
}

impl RegistryConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

fn de_address<'de, D: Deserializer<'de>>(d: D) -> Result<Address, D::Error> {
    let s = String::deserialize(d)?;
    s.parse().map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let c = RegistryConfig::from_toml_str("").unwrap();
        assert_eq!(c, RegistryConfig::default());
        assert_eq!(c.min_reveal_delay_secs, 60);
    }

    #[test]
    fn fields_override_defaults() {
        let c = RegistryConfig::from_toml_str(
            "min_reveal_delay_secs = 5\nstore_id = \"0x0101010101010101010101010101010101010101\"\n",
        )
        .unwrap();
        assert_eq!(c.min_reveal_delay_secs, 5);
        assert_eq!(c.store_id, Address([1u8; 20]));
    }

    #[test]
    fn bad_store_id_and_unknown_keys_rejected() {
        assert!(RegistryConfig::from_toml_str("store_id = \"0x12\"").is_err());
        assert!(RegistryConfig::from_toml_str("delay = 3").is_err());
    }
}
