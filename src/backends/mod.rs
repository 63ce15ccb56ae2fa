/// Backing stores the record source reads from
///
/// Three read-only collaborators, each behind a trait so they can be
/// injected at startup and replaced by in-memory versions in tests:
/// - chain RPC (`eth_call` on a member contract)
/// - root identifier directory (root → member contract)
/// - profile store (wallet → off-chain profile)

pub mod business;
pub mod memory;
pub mod rpc;
pub mod supabase;

pub use business::{BusinessContract, OnchainUser};
pub use memory::{StaticDirectory, StaticProfiles};
pub use rpc::JsonRpcChainReader;
pub use supabase::{SupabaseClient, SupabaseDirectory, SupabaseProfiles};

use crate::error::GatewayResult;
use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Read-only chain access
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Execute a view call against `to` with ABI-encoded `input`
    async fn call(&self, to: Address, input: Bytes) -> GatewayResult<Bytes>;
}

/// Root identifier directory
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Member contract registered for `root`, if any
    async fn contract_for(&self, root: &str) -> GatewayResult<Option<Address>>;
}

/// Off-chain profile store
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Profile for `wallet`, if any
    async fn profile_for(&self, wallet: Address) -> GatewayResult<Option<ProfileRecord>>;
}

/// Off-chain profile, as stored in the `user_profiles` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub social_links: Option<SocialLinks>,
}

/// Social handles attached to a profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub discord: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
}
