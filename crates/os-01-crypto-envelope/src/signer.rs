//! # Ed25519 Signer
//!
//! Holds a validator's keypair. Twisted Edwards curve signatures with
//! deterministic nonces: signing needs no RNG.

use crate::address::derive_address;
use crate::CryptoError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::{Signer as _, SigningKey};
use shared_types::{Address, PublicKey, Signature};

/// Public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;

/// Keypair length in bytes (32-byte seed followed by the 32-byte public key).
pub const KEYPAIR_LENGTH: usize = ed25519_dalek::KEYPAIR_LENGTH;

/// Signature length in bytes.
pub const SIGNATURE_LENGTH: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// Ed25519 signing identity.
///
/// The secret key is zeroized on drop by `ed25519-dalek`.
pub struct Signer {
    signing_key: SigningKey,
}

impl Signer {
    /// Generate a random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        Self { signing_key }
    }

    /// Create from a 32-byte secret seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Create from a 64-byte keypair.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength` if `bytes` is not exactly 64 bytes
    /// - `InvalidPrivateKey` if the public half does not match the seed
    pub fn from_keypair_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let keypair: [u8; KEYPAIR_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: KEYPAIR_LENGTH,
                    actual: bytes.len(),
                })?;
        let signing_key =
            SigningKey::from_keypair_bytes(&keypair).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Create from a base64-encoded 64-byte keypair.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|_| CryptoError::InvalidEncoding { field: "keypair" })?;
        Self::from_keypair_bytes(&bytes)
    }

    /// Raw public key.
    pub fn public_key(&self) -> PublicKey {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Public key as carried in `proof.from`.
    pub fn public_key_base64(&self) -> String {
        STANDARD.encode(self.public_key())
    }

    /// Canonical address of this signer.
    pub fn address(&self) -> Address {
        derive_address(&self.public_key())
    }

    /// Sign a message (deterministic).
    pub fn sign_bytes(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message).to_bytes()
    }

    /// Export the 64-byte keypair.
    pub fn to_keypair_bytes(&self) -> [u8; KEYPAIR_LENGTH] {
        self.signing_key.to_keypair_bytes()
    }

    /// Export the keypair as base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_keypair_bytes())
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
