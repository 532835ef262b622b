use thiserror::Error;

pub type Result<T> = std::result::Result<T, RevocationError>;

#[derive(Error, Debug)]
pub enum RevocationError {
    #[error("revocation entry signature invalid for {0}")]
    InvalidSignature(String),

    #[error(transparent)]
    Crypto(#[from] dct_crypto::CryptoError),

    #[error("revocation entry already present: {0}")]
    AlreadyExists(String),

    #[error("failed to (de)serialize revocation entries: {0}")]
    Serde(String),
}
