//! Sign/verify/hash primitives and the composite object-signing helpers
//! every signed record in this workspace is built on.

use crate::canonical::canonicalize;
use crate::error::{CryptoError, Result};
use crate::keypair::{KeyPair, PublicKey, SIGNATURE_LEN};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::{Signature, Signer, Verifier};
use serde::Serialize;

type Blake2b256 = Blake2b<U32>;

/// BLAKE2b with a 32-byte digest.
pub fn blake2b256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(bytes);
    let out = hasher.finalize();
    out.into()
}

/// Sign a message directly. Most callers want [`sign_object`] instead.
pub fn sign(keypair: &KeyPair, message: &[u8]) -> [u8; SIGNATURE_LEN] {
    keypair.signing_key().sign(message).to_bytes()
}

/// Verify a raw message signature. Constant-time relative to
/// fixed-length inputs, courtesy of `ed25519-dalek`.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &[u8]) -> Result<bool> {
    let sig_bytes: [u8; SIGNATURE_LEN] =
        signature
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureLength {
                expected: SIGNATURE_LEN,
                actual: signature.len(),
            })?;
    let sig = Signature::from_bytes(&sig_bytes);
    Ok(public_key.0.verify(message, &sig).is_ok())
}

pub fn principal_id(public_key: &PublicKey) -> String {
    public_key.to_principal_id()
}

/// `sign(priv, blake2b256(canonicalize(value)))`, base64url-encoded.
pub fn sign_object<T: Serialize>(keypair: &KeyPair, value: &T) -> Result<String> {
    let canon = canonicalize(value)?;
    let digest = blake2b256(&canon);
    let sig = sign(keypair, &digest);
    Ok(URL_SAFE_NO_PAD.encode(sig))
}

/// Inverse of [`sign_object`].
pub fn verify_object_signature<T: Serialize>(
    public_key: &PublicKey,
    value: &T,
    signature_b64: &str,
) -> Result<bool> {
    let sig_bytes = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|e| CryptoError::Base64(e.to_string()))?;
    let canon = canonicalize(value)?;
    let digest = blake2b256(&canon);
    verify(public_key, &digest, &sig_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blake2b256_is_deterministic_and_32_bytes() {
        let a = blake2b256(b"hello");
        let b = blake2b256(b"hello");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert_ne!(a, blake2b256(b"world"));
    }

    #[test]
    fn object_signature_round_trips() {
        let kp = KeyPair::generate();
        let value = json!({"task": "dig a hole", "budget": 100});
        let sig = sign_object(&kp, &value).unwrap();
        assert!(verify_object_signature(kp.public_key(), &value, &sig).unwrap());
    }

    #[test]
    fn mutating_the_object_invalidates_the_signature() {
        let kp = KeyPair::generate();
        let value = json!({"task": "dig a hole", "budget": 100});
        let sig = sign_object(&kp, &value).unwrap();
        let mutated = json!({"task": "dig a hole", "budget": 101});
        assert!(!verify_object_signature(kp.public_key(), &mutated, &sig).unwrap());
    }

    #[test]
    fn mutating_the_signature_invalidates_it() {
        let kp = KeyPair::generate();
        let value = json!({"task": "dig a hole"});
        let mut sig = sign_object(&kp, &value).unwrap();
        sig.pop();
        sig.push(if sig.ends_with('A') { 'B' } else { 'A' });
        assert!(!verify_object_signature(kp.public_key(), &value, &sig).unwrap_or(false));
    }

    #[test]
    fn wrong_signer_fails_verification() {
        let kp_a = KeyPair::generate();
        let kp_b = KeyPair::generate();
        let value = json!({"task": "x"});
        let sig = sign_object(&kp_a, &value).unwrap();
        assert!(!verify_object_signature(kp_b.public_key(), &value, &sig).unwrap());
    }
}
