/// Hex / base64 helpers for addresses and calldata on the wire
use alloy_primitives::Address;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// `0x`-prefixed lower-case hex
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode `0x`-prefixed hex
pub fn decode_hex(value: &str) -> Result<Vec<u8>, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| format!("'{}' is missing the 0x prefix", value))?;
    hex::decode(digits).map_err(|e| e.to_string())
}

/// Parse a `0x`-prefixed 20-byte address; checksum casing is not enforced
pub fn parse_address(value: &str) -> Result<Address, String> {
    let bytes = decode_hex(value.trim())?;
    if bytes.len() != 20 {
        return Err(format!("expected 20 bytes, got {}", bytes.len()));
    }
    Ok(Address::from_slice(&bytes))
}

/// Decode calldata given either as `0x` hex or as URL-safe base64
/// (with or without padding)
pub fn decode_calldata(value: &str) -> Result<Vec<u8>, String> {
    if value.starts_with("0x") || value.starts_with("0X") {
        return decode_hex(value);
    }

    URL_SAFE_NO_PAD
        .decode(value.trim_end_matches('='))
        .map_err(|e| format!("calldata is neither 0x hex nor URL-safe base64: {}", e))
}
