#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

//! cfreg deterministic content store.
//!
//! A write-once key space where the key (location) of a blob is a pure
//! function of the store identity, a 32-byte salt and the blob itself.
//! Anyone can compute where content *will* live before it is written;
//! each location can be written at most once, ever.

use std::collections::HashMap;

use cfreg_primitives::{
    constants::{ADDRESS_LEN, SUB_SALT_LEN, TAG_LOCATION},
    content_digest, h_tag, Address, EffectiveSalt, Location, SubSalt,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("location {0} already holds data")]
    AlreadyOccupied(Location),

    #[error("content at {0} failed its integrity check")]
    Corrupted(Location),
}

/// Pack `creator` into the high-order 20 bytes and `sub_salt` into the
/// low-order 12 bytes of a 32-byte salt.
#[must_use]
pub fn effective_salt(creator: &Address, sub_salt: &SubSalt) -> EffectiveSalt {
    let mut out = [0u8; ADDRESS_LEN + SUB_SALT_LEN];
    out[..ADDRESS_LEN].copy_from_slice(&creator.0);
    out[ADDRESS_LEN..].copy_from_slice(&sub_salt.0);
    EffectiveSalt(out)
}

/// Inverse of [`effective_salt`].
#[must_use]
pub fn split_effective_salt(salt: &EffectiveSalt) -> (Address, SubSalt) {
    let mut creator = [0u8; ADDRESS_LEN];
    let mut sub = [0u8; SUB_SALT_LEN];
    creator.copy_from_slice(&salt.0[..ADDRESS_LEN]);
    sub.copy_from_slice(&salt.0[ADDRESS_LEN..]);
    (Address(creator), SubSalt(sub))
}

/// `Location = last20( H("cfreg.location", [store_id, salt, H("cfreg.content", [content])]) )`
#[must_use]
pub fn predict_location(store_id: &Address, content: &[u8], salt: &EffectiveSalt) -> Location {
    let digest = content_digest(content);
    Location::from_digest(&h_tag(TAG_LOCATION, &[&store_id.0, &salt.0, &digest]))
}

/// Write-once storage keyed by predictable locations.
pub trait ContentStore {
    /// Identity mixed into every location this store derives.
    fn store_id(&self) -> Address;

    /// Write `content` at its predicted location; fails if the location is taken.
    fn write(&mut self, content: &[u8], salt: &EffectiveSalt) -> Result<Location, StoreError>;

    /// Content previously written at `location`, or `None` if never written.
    fn read(&self, location: &Location) -> Result<Option<&[u8]>, StoreError>;

    /// Where `content` would land under `salt`. Never writes.
    fn predict_location(&self, content: &[u8], salt: &EffectiveSalt) -> Location {
        predict_location(&self.store_id(), content, salt)
    }

    fn is_occupied(&self, location: &Location) -> bool {
        !matches!(self.read(location), Ok(None))
    }
}

struct Blob {
    bytes: Vec<u8>,
    checksum: blake3::Hash,
}

/// In-process content store. Blobs carry a BLAKE3 checksum verified on read.
pub struct MemoryStore {
    id: Address,
    blobs: HashMap<Location, Blob>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(id: Address) -> Self {
        Self { id, blobs: HashMap::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    #[cfg(test)]
    fn tamper(&mut self, location: &Location, bytes: &[u8]) {
        if let Some(blob) = self.blobs.get_mut(location) {
            blob.bytes = bytes.to_vec();
        }
    }
}

impl ContentStore for MemoryStore {
    fn store_id(&self) -> Address {
        self.id
    }

    fn write(&mut self, content: &[u8], salt: &EffectiveSalt) -> Result<Location, StoreError> {
        let location = self.predict_location(content, salt);
        if self.blobs.contains_key(&location) {
            tracing::warn!(%location, "write rejected: location occupied");
            return Err(StoreError::AlreadyOccupied(location));
        }
        self.blobs.insert(
            location,
            Blob { bytes: content.to_vec(), checksum: blake3::hash(content) },
        );
        tracing::debug!(%location, len = content.len(), "content written");
        Ok(location)
    }

    fn read(&self, location: &Location) -> Result<Option<&[u8]>, StoreError> {
        let Some(blob) = self.blobs.get(location) else {
            return Ok(None);
        };
        if blake3::hash(&blob.bytes) != blob.checksum {
            return Err(StoreError::Corrupted(*location));
        }
        Ok(Some(&blob.bytes))
    }
}
