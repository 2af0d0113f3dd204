use cfreg_primitives::Location;
use cfreg_store::StoreError;
use thiserror::Error;

use crate::{ledger::LedgerError, types::TokenId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("token {0} does not exist")]
    NotFound(TokenId),

    #[error("token {id} cannot be revealed before {ready_at} (now {now})")]
    TooEarly { id: TokenId, ready_at: u64, now: u64 },

    #[error("content revealed for token {id} at {location} does not match its commitment")]
    WrongContent { id: TokenId, location: Location },

    #[error("token {id} was already revealed at {location}")]
    AlreadyRevealed { id: TokenId, location: Location },

    #[error("location {0} already holds data")]
    AlreadyOccupied(Location),

    #[error("token identifier space exhausted")]
    IdentifiersExhausted,

    #[error("content store failure: {0}")]
    Store(StoreError),

    #[error("ownership ledger rejected the operation: {0}")]
    Ledger(#[from] LedgerError),
}

impl From<StoreError> for RegistryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AlreadyOccupied(location) => Self::AlreadyOccupied(location),
            other => Self::Store(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("short input")]
    Short,
    #[error("trailing bytes")]
    Trailing,
    #[error("invalid field: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
