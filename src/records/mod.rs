/// Record resolution
///
/// A [`RecordSource`] answers the three record kinds the gateway serves.
/// Implementations never fail: every miss or backend fault becomes the
/// record kind's zero value with a short TTL, so a "not found" answer is
/// still a signed, verifiable statement.

pub mod contract_db;
pub mod text_keys;

pub use contract_db::ContractDirectorySource;
pub use text_keys::TextSource;

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;

/// SLIP-44 coin type of ETH; the only coin type with address support
pub const ETH_COIN_TYPE: u64 = 60;

/// TTL attached to resolved records (5 minutes)
pub const RECORD_TTL_SECS: u64 = 300;

/// TTL attached to negative answers; bounds how long a miss may be trusted
/// since directory entries can be added later
pub const NEGATIVE_TTL_SECS: u64 = 300;

/// Address record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub address: Address,
    pub ttl: u64,
}

impl AddressRecord {
    pub fn not_found() -> Self {
        Self {
            address: Address::ZERO,
            ttl: NEGATIVE_TTL_SECS,
        }
    }
}

/// Text record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    pub value: String,
    pub ttl: u64,
}

impl TextRecord {
    pub fn not_found() -> Self {
        Self {
            value: String::new(),
            ttl: NEGATIVE_TTL_SECS,
        }
    }
}

/// Content hash record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHashRecord {
    pub bytes: Bytes,
    pub ttl: u64,
}

impl ContentHashRecord {
    pub fn not_found() -> Self {
        Self {
            bytes: Bytes::new(),
            ttl: NEGATIVE_TTL_SECS,
        }
    }
}

/// Record resolution backend
///
/// Takes the literal dotted name, never the namehash.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Resolve the address for `coin_type` (SLIP-44)
    async fn resolve_address(&self, name: &str, coin_type: u64) -> AddressRecord;

    /// Resolve a text record
    async fn resolve_text(&self, name: &str, key: &str) -> TextRecord;

    /// Resolve the content hash
    async fn resolve_content_hash(&self, name: &str) -> ContentHashRecord;
}
