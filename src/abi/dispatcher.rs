/// Inner call dispatch
use super::{LookupRequest, RecordQuery};
use crate::{error::GatewayResult, metrics, records::RecordSource};
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolValue;
use std::sync::Arc;
use tracing::debug;

/// Outcome of a dispatched lookup, ready to be signed
#[derive(Debug, Clone)]
pub struct Resolution {
    /// ABI-encoded return value of the inner function
    pub result: Bytes,
    /// Freshness of the resolved record in seconds
    pub ttl: u64,
    /// Solidity signature of the inner function that was answered
    pub function: &'static str,
}

/// Routes decoded lookups to a [`RecordSource`] and re-encodes the answer
#[derive(Clone)]
pub struct CallDispatcher {
    source: Arc<dyn RecordSource>,
}

impl CallDispatcher {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Decode `calldata` sent on behalf of `target` and resolve it
    pub async fn dispatch(&self, target: Address, calldata: &[u8]) -> GatewayResult<Resolution> {
        let request = LookupRequest::decode(target, calldata)?;
        Ok(self.resolve(&request).await)
    }

    /// Resolve an already decoded request
    pub async fn resolve(&self, request: &LookupRequest) -> Resolution {
        let name = request.name.as_str();

        let (result, ttl): (Vec<u8>, u64) = match &request.query {
            RecordQuery::Addr | RecordQuery::AddrMulticoin { .. } => {
                let coin_type = request.coin_type().unwrap_or_default();
                let record = self.source.resolve_address(name, coin_type).await;
                metrics::record_resolution("address", !record.address.is_zero());

                let encoded = if request.query == RecordQuery::Addr {
                    record.address.abi_encode()
                } else {
                    Bytes::copy_from_slice(record.address.as_slice()).abi_encode()
                };
                (encoded, record.ttl)
            }
            RecordQuery::Text { key } => {
                let record = self.source.resolve_text(name, key).await;
                metrics::record_resolution("text", !record.value.is_empty());
                (record.value.abi_encode(), record.ttl)
            }
            RecordQuery::ContentHash => {
                let record = self.source.resolve_content_hash(name).await;
                metrics::record_resolution("contenthash", !record.bytes.is_empty());
                (record.bytes.abi_encode(), record.ttl)
            }
        };

        debug!(
            name = %name,
            node = %request.node,
            function = request.query.function(),
            ttl,
            "lookup_resolved"
        );

        Resolution {
            result: result.into(),
            ttl,
            function: request.query.function(),
        }
    }
}
