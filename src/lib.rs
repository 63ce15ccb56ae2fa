/// ENS CCIP-Read gateway
///
/// Answers EIP-3668 offchain lookups for ENS subnames issued by member
/// contracts, signing every answer so the on-chain resolver can verify it.

pub mod abi;
pub mod api;
pub mod backends;
pub mod config;
pub mod context;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod metrics;
pub mod name;
pub mod records;
pub mod server;

pub use config::GatewayConfig;
pub use context::AppContext;
pub use error::{GatewayError, GatewayResult};
