use thiserror::Error;

pub type Result<T> = std::result::Result<T, CryptoError>;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("expected a {expected}-byte key, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("expected a {expected}-byte signature, got {actual}")]
    InvalidSignatureLength { expected: usize, actual: usize },

    #[error("malformed ed25519 key or signature bytes: {0}")]
    MalformedBytes(String),

    #[error("failed to canonicalize value: {0}")]
    Canonicalization(String),

    #[error("base64url decode failed: {0}")]
    Base64(String),
}
