/// ABI surface of the offchain resolver
///
/// Decodes the outer `resolve(bytes,bytes)` call into a [`LookupRequest`]
/// and dispatches the inner record lookup.

pub mod dispatcher;

pub use dispatcher::{CallDispatcher, Resolution};

use crate::{
    error::{GatewayError, GatewayResult},
    name,
    records::ETH_COIN_TYPE,
};
use alloy_primitives::{Address, B256};
use alloy_sol_types::SolCall;

/// Function signatures the calling resolver contract hard-codes
pub mod bindings {
    alloy_sol_types::sol! {
        function resolve(bytes name, bytes data) external view returns (bytes);
        function addr(bytes32 node) external view returns (address);
        function addr(bytes32 node, uint256 coinType) external view returns (bytes);
        function text(bytes32 node, string key) external view returns (string);
        function contenthash(bytes32 node) external view returns (bytes);
    }
}

use bindings::{addr_0Call, addr_1Call, contenthashCall, resolveCall, textCall};

/// The record an inner call asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordQuery {
    /// `addr(bytes32)`
    Addr,
    /// `addr(bytes32,uint256)`
    AddrMulticoin { coin_type: u64 },
    /// `text(bytes32,string)`
    Text { key: String },
    /// `contenthash(bytes32)`
    ContentHash,
}

impl RecordQuery {
    /// Solidity signature of the inner function
    pub fn function(&self) -> &'static str {
        match self {
            RecordQuery::Addr => "addr(bytes32)",
            RecordQuery::AddrMulticoin { .. } => "addr(bytes32,uint256)",
            RecordQuery::Text { .. } => "text(bytes32,string)",
            RecordQuery::ContentHash => "contenthash(bytes32)",
        }
    }
}

/// A decoded `resolve(name, data)` call
///
/// `name` drives resolution. `node` is carried only because it is part of the
/// inner call; it is never used as a lookup key.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    pub target: Address,
    pub name: String,
    pub node: B256,
    pub query: RecordQuery,
}

impl LookupRequest {
    /// Decode outer calldata sent to the gateway on behalf of `target`
    pub fn decode(target: Address, calldata: &[u8]) -> GatewayResult<Self> {
        let outer_selector = selector_of(calldata)?;
        if outer_selector != resolveCall::SELECTOR {
            return Err(GatewayError::UnsupportedFunction(format!(
                "0x{}",
                hex::encode(outer_selector)
            )));
        }

        let outer = resolveCall::abi_decode(calldata).map_err(|e| {
            GatewayError::InvalidCalldata(format!("Failed to decode resolve call: {}", e))
        })?;

        let name = name::decode_dns_name(&outer.name)?;
        let inner = outer.data;
        let selector = selector_of(&inner)?;

        let (node, query) = if selector == addr_0Call::SELECTOR {
            let call = addr_0Call::abi_decode(&inner).map_err(inner_error)?;
            (call.node, RecordQuery::Addr)
        } else if selector == addr_1Call::SELECTOR {
            let call = addr_1Call::abi_decode(&inner).map_err(inner_error)?;
            // Anything wider than u64 cannot be a supported coin type
            let coin_type = u64::try_from(call.coinType).unwrap_or(u64::MAX);
            (call.node, RecordQuery::AddrMulticoin { coin_type })
        } else if selector == textCall::SELECTOR {
            let call = textCall::abi_decode(&inner).map_err(inner_error)?;
            (call.node, RecordQuery::Text { key: call.key })
        } else if selector == contenthashCall::SELECTOR {
            let call = contenthashCall::abi_decode(&inner).map_err(inner_error)?;
            (call.node, RecordQuery::ContentHash)
        } else {
            return Err(GatewayError::UnsupportedFunction(format!(
                "0x{}",
                hex::encode(selector)
            )));
        };

        Ok(Self {
            target,
            name,
            node,
            query,
        })
    }

    /// Coin type an address lookup targets (60 for the single-argument `addr`)
    pub fn coin_type(&self) -> Option<u64> {
        match self.query {
            RecordQuery::Addr => Some(ETH_COIN_TYPE),
            RecordQuery::AddrMulticoin { coin_type } => Some(coin_type),
            _ => None,
        }
    }
}

fn selector_of(calldata: &[u8]) -> GatewayResult<[u8; 4]> {
    calldata
        .get(..4)
        .and_then(|s| <[u8; 4]>::try_from(s).ok())
        .ok_or_else(|| GatewayError::InvalidCalldata("calldata shorter than a selector".into()))
}

fn inner_error(e: alloy_sol_types::Error) -> GatewayError {
    GatewayError::InvalidCalldata(format!("Failed to decode inner call: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, U256};

    const RESOLVER: Address = address!("8464135c8F25Da09e49BC8782676a84730C318bC");

    fn outer(name: &str, inner: Vec<u8>) -> Vec<u8> {
        resolveCall {
            name: name::encode_dns_name(name).unwrap().into(),
            data: inner.into(),
        }
        .abi_encode()
    }

    #[test]
    fn test_known_selectors() {
        assert_eq!(resolveCall::SELECTOR, [0x90, 0x61, 0xb9, 0x23]);
        assert_eq!(addr_0Call::SELECTOR, [0x3b, 0x3b, 0x57, 0xde]);
        assert_eq!(addr_1Call::SELECTOR, [0xf1, 0xcb, 0x7e, 0x06]);
        assert_eq!(textCall::SELECTOR, [0x59, 0xd1, 0xd4, 0x3c]);
        assert_eq!(contenthashCall::SELECTOR, [0xbc, 0x1c, 0x58, 0xd1]);
    }

    #[test]
    fn test_decode_text_request() {
        let node = B256::repeat_byte(0x11);
        let inner = textCall {
            node,
            key: "avatar".into(),
        }
        .abi_encode();
        let calldata = outer("sarah.joescoffee.eth", inner);
        let request = LookupRequest::decode(RESOLVER, &calldata).unwrap();

        assert_eq!(request.target, RESOLVER);
        assert_eq!(request.name, "sarah.joescoffee.eth");
        assert_eq!(request.node, node);
        assert_eq!(request.query, RecordQuery::Text { key: "avatar".into() });
        assert_eq!(request.coin_type(), None);
    }

    #[test]
    fn test_decode_multicoin_request() {
        let inner = addr_1Call {
            node: B256::ZERO,
            coinType: U256::from(0u64),
        }
        .abi_encode();
        let request = LookupRequest::decode(RESOLVER, &outer("a.b.eth", inner)).unwrap();
        assert_eq!(request.query, RecordQuery::AddrMulticoin { coin_type: 0 });

        let inner = addr_1Call {
            node: B256::ZERO,
            coinType: U256::MAX,
        }
        .abi_encode();
        let request = LookupRequest::decode(RESOLVER, &outer("a.b.eth", inner)).unwrap();
        assert_eq!(request.coin_type(), Some(u64::MAX));
    }

    #[test]
    fn test_decode_plain_addr_defaults_to_eth() {
        let inner = addr_0Call { node: B256::ZERO }.abi_encode();
        let request = LookupRequest::decode(RESOLVER, &outer("a.b.eth", inner)).unwrap();
        assert_eq!(request.coin_type(), Some(ETH_COIN_TYPE));
    }

    #[test]
    fn test_unknown_inner_selector() {
        let mut inner = vec![0xde, 0xad, 0xbe, 0xef];
        inner.extend_from_slice(&[0u8; 32]);
        let err = LookupRequest::decode(RESOLVER, &outer("a.b.eth", inner)).unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedFunction(ref s) if s == "0xdeadbeef"));
    }

    #[test]
    fn test_unknown_outer_selector() {
        let calldata = addr_0Call { node: B256::ZERO }.abi_encode();
        let err = LookupRequest::decode(RESOLVER, &calldata).unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedFunction(_)));
    }

    #[test]
    fn test_truncated_calldata() {
        assert!(matches!(
            LookupRequest::decode(RESOLVER, &[0x90, 0x61]),
            Err(GatewayError::InvalidCalldata(_))
        ));

        let mut calldata = outer("a.b.eth", addr_0Call { node: B256::ZERO }.abi_encode());
        calldata.truncate(40);
        assert!(matches!(
            LookupRequest::decode(RESOLVER, &calldata),
            Err(GatewayError::InvalidCalldata(_))
        ));
    }

    #[test]
    fn test_malformed_dns_name() {
        let calldata = resolveCall {
            name: vec![0x05, b'a', b'b'].into(),
            data: addr_0Call { node: B256::ZERO }.abi_encode().into(),
        }
        .abi_encode();
        assert!(matches!(
            LookupRequest::decode(RESOLVER, &calldata),
            Err(GatewayError::Name(_))
        ));
    }

    #[test]
    fn test_non_utf8_name_still_decodes() {
        let calldata = resolveCall {
            name: b"\x03a\xffb\x03eth\x00".to_vec().into(),
            data: addr_0Call { node: B256::ZERO }.abi_encode().into(),
        }
        .abi_encode();
        let request = LookupRequest::decode(RESOLVER, &calldata).unwrap();
        assert_eq!(request.name, "a\u{FFFD}b.eth");
        assert_eq!(request.query, RecordQuery::Addr);
    }

    #[test]
    fn test_trailing_bytes_after_name_rejected() {
        let calldata = resolveCall {
            name: b"\x05sarah\x00\x03eth\x00".to_vec().into(),
            data: addr_0Call { node: B256::ZERO }.abi_encode().into(),
        }
        .abi_encode();
        assert!(matches!(
            LookupRequest::decode(RESOLVER, &calldata),
            Err(GatewayError::Name(_))
        ));
    }
}
