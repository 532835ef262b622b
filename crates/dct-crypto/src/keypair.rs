//! Ed25519 key types.

use crate::error::{CryptoError, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;

pub const PUBLIC_KEY_LEN: usize = 32;
pub const PRIVATE_KEY_LEN: usize = 32;
pub const SIGNATURE_LEN: usize = 64;

/// An Ed25519 public key, also the basis of a principal's id.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(pub(crate) VerifyingKey);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; PUBLIC_KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: PUBLIC_KEY_LEN,
                    actual: bytes.len(),
                })?;
        let key = VerifyingKey::from_bytes(&arr)
            .map_err(|e| CryptoError::MalformedBytes(e.to_string()))?;
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.0.to_bytes()
    }

    /// `base64url(publicKey32)` — the principal id.
    pub fn to_principal_id(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.as_bytes())
    }

    pub fn from_principal_id(id: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(id)
            .map_err(|e| CryptoError::Base64(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_principal_id())
    }
}

/// An Ed25519 signing key, bundled with its derived public key.
pub struct KeyPair {
    signing_key: SigningKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let public_key = PublicKey(signing_key.verifying_key());
        tracing::debug!(principal = %public_key.to_principal_id(), "generated keypair");
        Self {
            signing_key,
            public_key,
        }
    }

    pub fn from_private_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; PRIVATE_KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: PRIVATE_KEY_LEN,
                    actual: bytes.len(),
                })?;
        let signing_key = SigningKey::from_bytes(&arr);
        let public_key = PublicKey(signing_key.verifying_key());
        Ok(Self {
            signing_key,
            public_key,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn principal_id(&self) -> String {
        self.public_key.to_principal_id()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("principal_id", &self.principal_id())
            .field("signing_key", &"[redacted]")
            .finish()
    }
}
