/// CCIP-Read response signing
///
/// Implements the signed-response convention of the ENS offchain resolver:
/// the resolver contract recomputes the same digest on-chain and checks the
/// recovered address against its list of trusted signers.

use crate::error::{GatewayError, GatewayResult};
use alloy_primitives::{keccak256, Address, Bytes, B256};
use alloy_sol_types::SolValue;
use k256::{
    ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey},
    SecretKey,
};

/// Prefix mandated by the signed-response format (EIP-191 version 0x00)
const SIGNATURE_PREFIX: [u8; 2] = [0x19, 0x00];

/// Compute the digest the resolver contract verifies:
/// `keccak256(0x1900 ‖ target ‖ expires(u64 BE) ‖ keccak256(request) ‖ keccak256(result))`
pub fn response_digest(target: Address, expires_at: u64, request: &[u8], result: &[u8]) -> B256 {
    let mut message = Vec::with_capacity(2 + 20 + 8 + 32 + 32);
    message.extend_from_slice(&SIGNATURE_PREFIX);
    message.extend_from_slice(target.as_slice());
    message.extend_from_slice(&expires_at.to_be_bytes());
    message.extend_from_slice(keccak256(request).as_slice());
    message.extend_from_slice(keccak256(result).as_slice());
    keccak256(&message)
}

/// Recover the signing address from a digest and a 65-byte `r ‖ s ‖ v` signature
pub fn recover_signer(digest: &B256, signature: &[u8]) -> GatewayResult<Address> {
    if signature.len() != 65 {
        return Err(GatewayError::Signing(format!(
            "signature must be 65 bytes, got {}",
            signature.len()
        )));
    }

    let sig = Signature::from_slice(&signature[..64])
        .map_err(|e| GatewayError::Signing(format!("Invalid signature: {}", e)))?;
    let recovery_id = RecoveryId::from_byte(signature[64].wrapping_sub(27))
        .ok_or_else(|| GatewayError::Signing(format!("Invalid recovery byte {}", signature[64])))?;

    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recovery_id)
        .map_err(|e| GatewayError::Signing(format!("Recovery failed: {}", e)))?;

    Ok(address_of(&key))
}

/// Ethereum address of a secp256k1 public key
fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash.as_slice()[12..])
}

/// A signed CCIP-Read response, alive for one HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedResponse {
    pub result: Bytes,
    pub expires_at: u64,
    pub signature: Bytes,
}

impl SignedResponse {
    /// ABI-encode as `(bytes result, uint64 expires, bytes sig)`, the tuple
    /// `resolveWithProof` decodes
    pub fn abi_encode(&self) -> Vec<u8> {
        (self.result.clone(), self.expires_at, self.signature.clone()).abi_encode_params()
    }
}

/// Response signer - holds the gateway's private key for the process lifetime
pub struct ResponseSigner {
    signing_key: SigningKey,
    address: Address,
}

impl ResponseSigner {
    /// Create a new signer from a private key (32 bytes)
    pub fn new(private_key: &[u8]) -> GatewayResult<Self> {
        if private_key.len() != 32 {
            return Err(GatewayError::Config(
                "Private key must be exactly 32 bytes".to_string(),
            ));
        }

        let secret_key = SecretKey::from_slice(private_key)
            .map_err(|e| GatewayError::Config(format!("Invalid private key: {}", e)))?;

        let signing_key = SigningKey::from(secret_key);
        let address = address_of(signing_key.verifying_key());

        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Create a signer from a hex-encoded private key (`0x` prefix optional)
    pub fn from_hex(hex_key: &str) -> GatewayResult<Self> {
        let trimmed = hex_key.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let key_bytes = hex::decode(digits)
            .map_err(|e| GatewayError::Config(format!("Invalid hex private key: {}", e)))?;

        Self::new(&key_bytes)
    }

    /// Address the resolver contract must list as a trusted signer
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a 32-byte digest, returning `r ‖ s ‖ v` with `v` in {27, 28}
    pub fn sign_digest(&self, digest: &B256) -> GatewayResult<[u8; 65]> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest.as_slice())
            .map_err(|e| GatewayError::Signing(format!("Failed to sign digest: {}", e)))?;

        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = recovery_id.to_byte() + 27;
        Ok(out)
    }

    /// Sign a resolved result for `target`, valid until `expires_at`
    ///
    /// `request` is the full outer calldata the client sent.
    pub fn sign_response(
        &self,
        target: Address,
        expires_at: u64,
        request: &[u8],
        result: Bytes,
    ) -> GatewayResult<SignedResponse> {
        let digest = response_digest(target, expires_at, request, &result);
        let signature = self.sign_digest(&digest)?;

        Ok(SignedResponse {
            result,
            expires_at,
            signature: Bytes::copy_from_slice(&signature),
        })
    }
}
