use cfreg_primitives::{Address, Hash256, Location};

/// Identifier issued by a commit. `0` is reserved and never issued.
pub type TokenId = u64;

/// Length of a canonically encoded [`Record`].
pub const RECORD_LEN: usize = 8 + 20 + 8 + 32 + 1 + 20; // 89 bytes

/// State kept for one issued identifier.
///
/// Everything but `location` is fixed at commit time. `location` is set
/// once, by the first successful reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record {
    pub id: TokenId,
    pub creator: Address,
    pub commit_time: u64,
    pub commitment: Hash256,
    pub location: Option<Location>,
}

impl Record {
    #[must_use]
    pub const fn is_revealed(&self) -> bool {
        self.location.is_some()
    }

    /// Earliest timestamp at which a reveal is accepted.
    #[must_use]
    pub const fn reveal_ready_at(&self, min_delay_secs: u64) -> u64 {
        self.commit_time.saturating_add(min_delay_secs)
    }
}

/// Notifications for external indexers, in the order they occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    Committed { id: TokenId, creator: Address, commitment: Hash256 },
    /// Emitted exactly once per successful reveal.
    MetadataUpdate { id: TokenId },
}
