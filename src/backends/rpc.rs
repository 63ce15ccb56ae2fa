/// JSON-RPC chain reader
use super::ChainReader;
use crate::{
    encoding,
    error::{GatewayError, GatewayResult},
};
use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// `eth_call` over HTTP JSON-RPC
#[derive(Clone)]
pub struct JsonRpcChainReader {
    http_client: reqwest::Client,
    rpc_url: String,
}

impl JsonRpcChainReader {
    pub fn new(http_client: reqwest::Client, rpc_url: impl Into<String>) -> Self {
        Self {
            http_client,
            rpc_url: rpc_url.into(),
        }
    }

    fn call_request(to: Address, input: &Bytes) -> serde_json::Value {
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [
                { "to": to.to_checksum(None), "data": encoding::to_hex(input) },
                "latest"
            ]
        })
    }
}

#[async_trait]
impl ChainReader for JsonRpcChainReader {
    async fn call(&self, to: Address, input: Bytes) -> GatewayResult<Bytes> {
        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&Self::call_request(to, &input))
            .send()
            .await
            .map_err(|e| GatewayError::Backend(format!("RPC request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GatewayError::Backend(format!(
                "RPC endpoint returned {}",
                response.status()
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Backend(format!("Invalid RPC response: {}", e)))?;

        parse_call_result(body)
    }
}

fn parse_call_result(body: RpcResponse) -> GatewayResult<Bytes> {
    if let Some(err) = body.error {
        return Err(GatewayError::Backend(format!(
            "eth_call reverted ({}): {}",
            err.code, err.message
        )));
    }

    let result = body
        .result
        .ok_or_else(|| GatewayError::Backend("RPC response has no result".to_string()))?;

    encoding::decode_hex(&result)
        .map(Bytes::from)
        .map_err(|e| GatewayError::Backend(format!("Invalid eth_call result: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_call_request_shape() {
        let to = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        let request = JsonRpcChainReader::call_request(to, &Bytes::from(vec![0xde, 0xad]));

        assert_eq!(request["method"], "eth_call");
        assert_eq!(request["params"][0]["to"], "0x5FbDB2315678afecb367f032d93F642f64180aa3");
        assert_eq!(request["params"][0]["data"], "0xdead");
        assert_eq!(request["params"][1], "latest");
    }

    #[test]
    fn test_parse_result() {
        let body: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x0102"}"#).unwrap();
        assert_eq!(parse_call_result(body).unwrap(), Bytes::from(vec![1, 2]));
    }

    #[test]
    fn test_parse_error_object() {
        let body: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":3,"message":"execution reverted"}}"#,
        )
        .unwrap();
        let err = parse_call_result(body).unwrap_err();
        assert!(err.to_string().contains("execution reverted"));
    }

    #[test]
    fn test_parse_missing_result() {
        let body: RpcResponse = serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert!(parse_call_result(body).is_err());
    }
}
