#![forbid(unsafe_code)]

pub const TAG_CONTENT: &str = "cfreg.content";
pub const TAG_LOCATION: &str = "cfreg.location";
pub const TAG_COMMITMENT: &str = "cfreg.commitment";
pub const TAG_ADDRESS: &str = "cfreg.address";

pub const ADDRESS_LEN: usize = 20;
pub const LOCATION_LEN: usize = 20;
pub const SUB_SALT_LEN: usize = 12;
pub const EFFECTIVE_SALT_LEN: usize = ADDRESS_LEN + SUB_SALT_LEN; // 32

/// Seconds a commitment must age before it can be revealed.
pub const DEFAULT_MIN_REVEAL_DELAY_SECS: u64 = 60;
