//! # Envelope Signing and Verification
//!
//! The signed message is the canonical encoding of `data` alone, not the whole
//! envelope, so re-encoding the envelope (key order, whitespace) never
//! invalidates a proof.

use crate::address::decode_public_key;
use crate::signer::{Signer, SIGNATURE_LENGTH};
use crate::CryptoError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::{Signature, VerifyingKey};
use serde_json::Value;
use shared_types::{canonical_bytes, Proof, SignedTransaction, TxKind};
use tracing::debug;

/// Sign `data` as a transaction of type `kind`.
pub fn sign(kind: TxKind, data: Value, signer: &Signer) -> Result<SignedTransaction, CryptoError> {
    let message = canonical_bytes(&data).map_err(|e| CryptoError::Encoding(e.to_string()))?;
    let signature = signer.sign_bytes(&message);

    Ok(SignedTransaction {
        kind: kind.as_str().to_string(),
        data,
        proof: Proof {
            from: signer.public_key_base64(),
            signature: STANDARD.encode(signature),
        },
    })
}

/// Verify an envelope's proof.
///
/// Malformed key material, wrong-length buffers and bad signatures all yield
/// `false`.
pub fn verify(tx: &SignedTransaction) -> bool {
    match verify_proof(tx) {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, kind = %tx.kind, "Envelope verification failed");
            false
        }
    }
}

fn verify_proof(tx: &SignedTransaction) -> Result<(), CryptoError> {
    let key_bytes = decode_public_key(&tx.proof.from)?;
    let verifying_key =
        VerifyingKey::from_bytes(&key_bytes).map_err(|_| CryptoError::InvalidPublicKey)?;

    let sig_bytes = STANDARD
        .decode(&tx.proof.signature)
        .map_err(|_| CryptoError::InvalidEncoding {
            field: "proof.signature",
        })?;
    let sig_array: [u8; SIGNATURE_LENGTH] =
        sig_bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureLength {
                expected: SIGNATURE_LENGTH,
                actual: sig_bytes.len(),
            })?;
    let signature = Signature::from_bytes(&sig_array);

    let message = canonical_bytes(&tx.data).map_err(|e| CryptoError::Encoding(e.to_string()))?;
    verifying_key
        .verify_strict(&message, &signature)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}
