use thiserror::Error;

pub type Result<T> = std::result::Result<T, AttestationError>;

#[derive(Error, Debug)]
pub enum AttestationError {
    #[error(transparent)]
    Crypto(#[from] dct_crypto::CryptoError),

    #[error("attestation {attestation_id} has kind {actual:?}, expected {expected:?}")]
    WrongKind {
        attestation_id: String,
        expected: crate::attestation::AttestationKind,
        actual: crate::attestation::AttestationKind,
    },
}
