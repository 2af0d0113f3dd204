#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

//! cfreg - counterfactual commit-reveal registry
//!
//! A creator commits to content before it exists by publishing
//! `H(location, creator)`, where `location` is the deterministic slot the
//! content will occupy in a write-once content store. After a fixed delay,
//! anyone can reveal the content; the registry writes it and accepts the
//! reveal only if the written location matches the commitment.

// Protocol choices:
// - Hash: domain-tagged SHA3-256 (`cfreg.*` tags)
// - Principals and locations: 20 bytes
// - Effective salt: creator(20) || sub-salt(12)
// - Reveal delay: inclusive, `now >= commit_time + delay`

pub mod config;
pub mod errors;
pub mod ledger;
pub mod registry;
pub mod ser;
pub mod types;

pub use cfreg_primitives::{Address, Hash256, Location, SubSalt};
pub use cfreg_store::{ContentStore, MemoryStore, StoreError};
pub use config::RegistryConfig;
pub use errors::{CodecError, ConfigError, RegistryError};
pub use ledger::{Ledger, LedgerError, TokenLedger};
pub use registry::{commitment_for, predict_location, unix_now, Registry};
pub use ser::{decode_record, encode_record};
pub use types::{Record, RegistryEvent, TokenId, RECORD_LEN};

/// Registry over the in-process store and ledger.
pub type MemoryRegistry = Registry<MemoryStore, Ledger>;

impl MemoryRegistry {
    /// Build a registry with a fresh store whose identity comes from `config`.
    #[must_use]
    pub fn in_memory(config: RegistryConfig) -> Self {
        Self::new(config, MemoryStore::new(config.store_id), Ledger::new())
    }
}

// Version and protocol constants
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROTOCOL_VERSION: u32 = 1;
