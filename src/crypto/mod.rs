/// Cryptography module for response signing and key management
///
/// Handles secp256k1 signing of EIP-3668 (CCIP-Read) responses

pub mod signer;

pub use signer::{recover_signer, response_digest, ResponseSigner, SignedResponse};
