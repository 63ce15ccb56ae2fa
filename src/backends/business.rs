/// Member contract binding
///
/// Each registered root identifier points at a contract exposing
/// `getUserByENSName`, which maps a full ENS name to its member record.
use super::ChainReader;
use crate::error::{GatewayError, GatewayResult};
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;

mod abi {
    alloy_sol_types::sol! {
        function getUserByENSName(string ensName)
            external
            view
            returns (
                address userAddress,
                uint256 totalPoints,
                string ensNameOnRecord,
                uint256 joinedAt
            );
    }
}

pub use abi::getUserByENSNameCall;

/// Member record held on-chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnchainUser {
    pub wallet: Address,
    pub points: U256,
    pub ens_name: String,
    pub joined_at: U256,
}

/// A member contract reached through a [`ChainReader`]
pub struct BusinessContract<'a> {
    chain: &'a dyn ChainReader,
    address: Address,
}

impl<'a> BusinessContract<'a> {
    pub fn new(chain: &'a dyn ChainReader, address: Address) -> Self {
        Self { chain, address }
    }

    /// Look up a member by full ENS name; the zero address means "no such member"
    pub async fn user_by_ens_name(&self, name: &str) -> GatewayResult<Option<OnchainUser>> {
        let input = getUserByENSNameCall {
            ensName: name.to_string(),
        }
        .abi_encode();

        let output = self.chain.call(self.address, input.into()).await?;

        let user = getUserByENSNameCall::abi_decode_returns(&output).map_err(|e| {
            GatewayError::Backend(format!("getUserByENSName decode failed: {}", e))
        })?;

        if user.userAddress.is_zero() {
            return Ok(None);
        }

        Ok(Some(OnchainUser {
            wallet: user.userAddress,
            points: user.totalPoints,
            ens_name: user.ensNameOnRecord,
            joined_at: user.joinedAt,
        }))
    }
}
