//! Commitment registry.
//!
//! A commit stores `H(location, creator)` for content that does not exist yet.
//! A reveal writes the content through the store under a salt derived from the
//! *stored* creator and accepts the result only if the written location hashes
//! back to that commitment. Anyone may submit the reveal; only the committed
//! content can satisfy it.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use cfreg_primitives::{commitment_hash, ct_eq_hash, Address, Hash256, Location, SubSalt};
use cfreg_store::{effective_salt, ContentStore};

use crate::{
    config::RegistryConfig,
    errors::RegistryError,
    ledger::TokenLedger,
    types::{Record, RegistryEvent, TokenId},
};

/// Current wall-clock time in unix seconds, for callers that have no better clock.
#[must_use]
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Where `content` will land once revealed for `creator` under `sub_salt`.
#[must_use]
pub fn predict_location<S: ContentStore + ?Sized>(
    store: &S,
    content: &[u8],
    creator: &Address,
    sub_salt: &SubSalt,
) -> Location {
    store.predict_location(content, &effective_salt(creator, sub_salt))
}

/// The commitment `creator` publishes before revealing `content`.
#[must_use]
pub fn commitment_for<S: ContentStore + ?Sized>(
    store: &S,
    content: &[u8],
    creator: &Address,
    sub_salt: &SubSalt,
) -> Hash256 {
    commitment_hash(&predict_location(store, content, creator, sub_salt), creator)
}

pub struct Registry<S, L> {
    config: RegistryConfig,
    store: S,
    ledger: L,
    last_id: TokenId,
    records: BTreeMap<TokenId, Record>,
    events: Vec<RegistryEvent>,
}

impl<S: ContentStore, L: TokenLedger> Registry<S, L> {
    #[must_use]
    pub fn new(config: RegistryConfig, store: S, ledger: L) -> Self {
        Self {
            config,
            store,
            ledger,
            last_id: 0,
            records: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Record a commitment for `caller` and issue it the next identifier.
    ///
    /// Identifiers start at 1. A ledger rejection or an exhausted identifier
    /// space leaves the registry unchanged.
    pub fn commit(
        &mut self,
        caller: Address,
        commitment: Hash256,
        now: u64,
    ) -> Result<TokenId, RegistryError> {
        let id = self.last_id.checked_add(1).ok_or(RegistryError::IdentifiersExhausted)?;
        self.ledger.issue(id, caller)?;
        self.last_id = id;
        self.records.insert(
            id,
            Record { id, creator: caller, commit_time: now, commitment, location: None },
        );
        self.events.push(RegistryEvent::Committed { id, creator: caller, commitment });
        tracing::debug!(id, creator = %caller, commit_time = now, "commitment recorded");
        Ok(id)
    }

    /// Write `content` for token `id` and check it against the stored commitment.
    ///
    /// The salt is derived from the record's creator, not from whoever calls
    /// this. A store write that then fails the commitment check is permanent:
    /// the location stays occupied and cannot be reused.
    pub fn reveal(
        &mut self,
        id: TokenId,
        content: &[u8],
        sub_salt: &SubSalt,
        now: u64,
    ) -> Result<Location, RegistryError> {
        let record = *self.records.get(&id).ok_or(RegistryError::NotFound(id))?;
        if let Some(location) = record.location {
            tracing::warn!(id, %location, "reveal rejected: already revealed");
            return Err(RegistryError::AlreadyRevealed { id, location });
        }
        let ready_at = record.reveal_ready_at(self.config.min_reveal_delay_secs);
        if now < ready_at {
            tracing::warn!(id, ready_at, now, "reveal rejected: too early");
            return Err(RegistryError::TooEarly { id, ready_at, now });
        }

        let salt = effective_salt(&record.creator, sub_salt);
        let location = self.store.write(content, &salt)?;

        if !ct_eq_hash(&commitment_hash(&location, &record.creator), &record.commitment) {
            tracing::warn!(id, %location, "reveal rejected: content does not match commitment");
            return Err(RegistryError::WrongContent { id, location });
        }

        if let Some(r) = self.records.get_mut(&id) {
            r.location = Some(location);
        }
        self.events.push(RegistryEvent::MetadataUpdate { id });
        tracing::info!(id, %location, len = content.len(), "content revealed");
        Ok(location)
    }

    pub fn record(&self, id: TokenId) -> Result<&Record, RegistryError> {
        self.records.get(&id).ok_or(RegistryError::NotFound(id))
    }

    /// Content stored at `location`, or `None` if nothing was written there.
    pub fn content_at(&self, location: &Location) -> Result<Option<&[u8]>, RegistryError> {
        Ok(self.store.read(location)?)
    }

    /// Revealed content of token `id`; `None` while unrevealed.
    pub fn content_of(&self, id: TokenId) -> Result<Option<&[u8]>, RegistryError> {
        match self.record(id)?.location {
            Some(location) => self.content_at(&location),
            None => Ok(None),
        }
    }

    #[must_use]
    pub fn exists(&self, id: TokenId) -> bool {
        self.records.contains_key(&id) && self.ledger.exists(id)
    }

    pub fn owner_of(&self, id: TokenId) -> Result<Address, RegistryError> {
        self.ledger.owner_of(id).ok_or(RegistryError::NotFound(id))
    }

    pub fn is_revealed(&self, id: TokenId) -> Result<bool, RegistryError> {
        Ok(self.record(id)?.is_revealed())
    }

    pub fn reveal_ready_at(&self, id: TokenId) -> Result<u64, RegistryError> {
        Ok(self.record(id)?.reveal_ready_at(self.config.min_reveal_delay_secs))
    }

    /// Number of identifiers issued so far; also the highest identifier.
    #[must_use]
    pub const fn total_issued(&self) -> u64 {
        self.last_id
    }

    #[must_use]
    pub fn predict_location(&self, content: &[u8], creator: &Address, sub_salt: &SubSalt) -> Location {
        predict_location(&self.store, content, creator, sub_salt)
    }

    #[must_use]
    pub fn commitment_for(&self, content: &[u8], creator: &Address, sub_salt: &SubSalt) -> Hash256 {
        commitment_for(&self.store, content, creator, sub_salt)
    }

    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    #[must_use]
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    /// Hand pending events to an indexer.
    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use cfreg_store::MemoryStore;

    const T0: u64 = 1_000;

    fn registry() -> Registry<MemoryStore, Ledger> {
        let config = RegistryConfig::default();
        Registry::new(config, MemoryStore::new(config.store_id), Ledger::new())
    }

    fn alice() -> Address {
        Address([0xA1; 20])
    }

    #[test]
    fn identifiers_start_at_one() {
        let mut r = registry();
        assert_eq!(r.commit(alice(), [0; 32], T0).unwrap(), 1);
        assert_eq!(r.commit(alice(), [0; 32], T0).unwrap(), 2);
        assert_eq!(r.total_issued(), 2);
        assert!(!r.exists(0));
        assert!(r.exists(2));
    }

    #[test]
    fn exhausted_identifier_space_is_an_error() {
        let mut r = registry();
        r.last_id = TokenId::MAX;
        assert_eq!(r.commit(alice(), [0; 32], T0), Err(RegistryError::IdentifiersExhausted));
        assert_eq!(r.total_issued(), TokenId::MAX);
        assert!(r.events().is_empty());
        assert!(r.ledger().owner_of(TokenId::MAX).is_none());
    }

    #[test]
    fn ledger_rejection_consumes_no_identifier() {
        let mut r = registry();
        assert!(matches!(
            r.commit(Address::ZERO, [0; 32], T0),
            Err(RegistryError::Ledger(_))
        ));
        assert_eq!(r.total_issued(), 0);
        assert!(r.events().is_empty());
        assert_eq!(r.commit(alice(), [0; 32], T0).unwrap(), 1);
    }

    #[test]
    fn reveal_succeeds_and_emits_one_update() {
        let mut r = registry();
        let salt = SubSalt::from_u64(0);
        let c = r.commitment_for(b"hello", &alice(), &salt);
        let id = r.commit(alice(), c, T0).unwrap();
        let delay = r.config().min_reveal_delay_secs;
        let loc = r.reveal(id, b"hello", &salt, T0 + delay).unwrap();
        assert_eq!(loc, r.predict_location(b"hello", &alice(), &salt));
        assert_eq!(r.content_of(id).unwrap(), Some(&b"hello"[..]));
        let updates = r
            .events()
            .iter()
            .filter(|e| matches!(e, RegistryEvent::MetadataUpdate { .. }))
            .count();
        assert_eq!(updates, 1);
    }

    #[test]
    fn unknown_token_is_not_found() {
        let mut r = registry();
        assert_eq!(
            r.reveal(7, b"x", &SubSalt::default(), T0),
            Err(RegistryError::NotFound(7))
        );
        assert_eq!(r.owner_of(7), Err(RegistryError::NotFound(7)));
        assert!(r.record(0).is_err());
    }

    #[test]
    fn early_reveal_touches_nothing() {
        let mut r = registry();
        let salt = SubSalt::from_u64(1);
        let c = r.commitment_for(b"x", &alice(), &salt);
        let id = r.commit(alice(), c, T0).unwrap();
        assert!(matches!(
            r.reveal(id, b"x", &salt, T0),
            Err(RegistryError::TooEarly { .. })
        ));
        assert!(r.store().is_empty());
    }

    #[test]
    fn drain_empties_the_journal() {
        let mut r = registry();
        r.commit(alice(), [1; 32], T0).unwrap();
        assert_eq!(r.drain_events().len(), 1);
        assert!(r.events().is_empty());
    }

    #[test]
    fn unix_now_is_after_2020() {
        assert!(unix_now() > 1_577_836_800);
    }
}
