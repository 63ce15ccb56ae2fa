/// Contract + directory record source
///
/// Resolution path for every record kind:
/// 1. split the name into leaf and root
/// 2. root → member contract (directory)
/// 3. full name → member record (`getUserByENSName` on that contract)
/// 4. answer from the member record, plus the off-chain profile for text keys
///
/// Any miss, error or timeout along the way yields the negative answer.
use super::{
    text_keys::TextContext, AddressRecord, ContentHashRecord, RecordSource, TextRecord,
    TextSource, ETH_COIN_TYPE, RECORD_TTL_SECS,
};
use crate::{
    backends::{BusinessContract, ChainReader, DirectoryStore, OnchainUser, ProfileStore},
    error::GatewayResult,
    metrics,
    name::{self, ParsedName},
};
use alloy_primitives::Address;
use async_trait::async_trait;
use std::{future::Future, sync::Arc, time::Duration};
use tracing::{debug, warn};

/// A name that resolved all the way to an on-chain member
struct Member {
    parsed: ParsedName,
    contract: Address,
    user: OnchainUser,
}

/// Record source backed by member contracts and a root directory
#[derive(Clone)]
pub struct ContractDirectorySource {
    directory: Arc<dyn DirectoryStore>,
    chain: Arc<dyn ChainReader>,
    profiles: Arc<dyn ProfileStore>,
    call_timeout: Duration,
}

impl ContractDirectorySource {
    pub fn new(
        directory: Arc<dyn DirectoryStore>,
        chain: Arc<dyn ChainReader>,
        profiles: Arc<dyn ProfileStore>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            directory,
            chain,
            profiles,
            call_timeout,
        }
    }

    /// Run one backend call under the per-call timeout, folding errors and
    /// timeouts into `None`
    async fn bounded<T, F>(&self, backend: &'static str, call: F) -> Option<T>
    where
        F: Future<Output = GatewayResult<Option<T>>>,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(found)) => {
                let outcome = if found.is_some() { "hit" } else { "miss" };
                metrics::record_backend_call(backend, outcome);
                found
            }
            Ok(Err(e)) => {
                metrics::record_backend_call(backend, "error");
                warn!(backend, error = %e, "backend_call_failed");
                None
            }
            Err(_) => {
                metrics::record_backend_call(backend, "timeout");
                warn!(
                    backend,
                    timeout_ms = self.call_timeout.as_millis() as u64,
                    "backend_call_timed_out"
                );
                None
            }
        }
    }

    async fn member(&self, name: &str) -> Option<Member> {
        let parsed = match name::parse(name) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(name = %name, error = %e, "invalid_name");
                return None;
            }
        };

        let Some(contract) = self
            .bounded("directory", self.directory.contract_for(&parsed.root))
            .await
        else {
            debug!(root = %parsed.root, "root_not_registered");
            return None;
        };

        let business = BusinessContract::new(self.chain.as_ref(), contract);
        let Some(user) = self.bounded("chain", business.user_by_ens_name(name)).await else {
            debug!(name = %name, contract = %contract, "member_not_found");
            return None;
        };

        Some(Member {
            parsed,
            contract,
            user,
        })
    }
}

#[async_trait]
impl RecordSource for ContractDirectorySource {
    async fn resolve_address(&self, name: &str, coin_type: u64) -> AddressRecord {
        if coin_type != ETH_COIN_TYPE {
            debug!(name = %name, coin_type, "unsupported_coin_type");
            return AddressRecord::not_found();
        }

        match self.member(name).await {
            Some(member) => AddressRecord {
                address: member.user.wallet,
                ttl: RECORD_TTL_SECS,
            },
            None => AddressRecord::not_found(),
        }
    }

    async fn resolve_text(&self, name: &str, key: &str) -> TextRecord {
        let Some(member) = self.member(name).await else {
            return TextRecord::not_found();
        };

        let Some(source) = TextSource::for_key(key) else {
            debug!(name = %name, key = %key, "unknown_text_key");
            return TextRecord {
                value: String::new(),
                ttl: RECORD_TTL_SECS,
            };
        };

        let profile = if source.needs_profile() {
            self.bounded("profile", self.profiles.profile_for(member.user.wallet))
                .await
        } else {
            None
        };

        let ctx = TextContext {
            profile: profile.as_ref(),
            user: &member.user,
            root: &member.parsed.root,
            contract: member.contract,
        };

        TextRecord {
            value: source.value(&ctx),
            ttl: RECORD_TTL_SECS,
        }
    }

    async fn resolve_content_hash(&self, name: &str) -> ContentHashRecord {
        debug!(name = %name, "contenthash_not_supported");
        ContentHashRecord::not_found()
    }
}
