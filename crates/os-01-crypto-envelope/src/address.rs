//! # Address Derivation
//!
//! `address = hex(sha256(pubkey)[..20])`, the identifier used for validators
//! and order posters alike.

use crate::signer::PUBLIC_KEY_LENGTH;
use crate::CryptoError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};
use shared_types::{Address, Proof, PublicKey};

/// Bytes of the digest kept in an address.
pub const ADDRESS_LENGTH: usize = 20;

/// Derive the canonical address of a public key.
pub fn derive_address(public_key: &PublicKey) -> Address {
    let digest = Sha256::digest(public_key);
    hex::encode(&digest[..ADDRESS_LENGTH])
}

/// Derive the signer address carried in an envelope proof.
pub fn address_from_proof(proof: &Proof) -> Result<Address, CryptoError> {
    address_from_base64(&proof.from)
}

/// Derive the address of a base64-encoded public key.
pub fn address_from_base64(encoded: &str) -> Result<Address, CryptoError> {
    let key = decode_public_key(encoded)?;
    Ok(derive_address(&key))
}

pub(crate) fn decode_public_key(encoded: &str) -> Result<PublicKey, CryptoError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| CryptoError::InvalidEncoding { field: "proof.from" })?;
    <PublicKey>::try_from(bytes.as_slice()).map_err(|_| CryptoError::InvalidKeyLength {
        expected: PUBLIC_KEY_LENGTH,
        actual: bytes.len(),
    })
}
