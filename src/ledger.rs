//! Token-ownership collaborator.
//!
//! The registry only needs to issue a fresh identifier to its committer and to
//! ask whether an identifier exists. Transfer, approval and enumeration live
//! outside this crate.

use std::collections::BTreeMap;

use cfreg_primitives::Address;
use thiserror::Error;

use crate::types::TokenId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("cannot issue to the zero address")]
    ZeroOwner,
    #[error("token {0} already issued")]
    AlreadyIssued(TokenId),
}

pub trait TokenLedger {
    fn issue(&mut self, id: TokenId, owner: Address) -> Result<(), LedgerError>;
    fn owner_of(&self, id: TokenId) -> Option<Address>;
    fn exists(&self, id: TokenId) -> bool {
        self.owner_of(id).is_some()
    }
}

/// In-memory ownership table.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    owners: BTreeMap<TokenId, Address>,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn balance_of(&self, owner: &Address) -> usize {
        self.owners.values().filter(|o| *o == owner).count()
    }
}

impl TokenLedger for Ledger {
    fn issue(&mut self, id: TokenId, owner: Address) -> Result<(), LedgerError> {
        if owner.is_zero() {
            return Err(LedgerError::ZeroOwner);
        }
        if self.owners.contains_key(&id) {
            return Err(LedgerError::AlreadyIssued(id));
        }
        self.owners.insert(id, owner);
        Ok(())
    }

    fn owner_of(&self, id: TokenId) -> Option<Address> {
        self.owners.get(&id).copied()
    }
}
