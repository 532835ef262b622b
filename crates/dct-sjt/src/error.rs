use thiserror::Error;

pub type Result<T> = std::result::Result<T, SjtError>;

#[derive(Error, Debug)]
pub enum SjtError {
    #[error(transparent)]
    Crypto(#[from] dct_crypto::CryptoError),

    /// `attenuateDCT` refuses to widen capabilities, budget, expiration,
    /// or chain depth relative to the block it attenuates.
    #[error("attenuation would widen {field}: parent={parent}, requested={requested}")]
    AttenuationViolation {
        field: &'static str,
        parent: String,
        requested: String,
    },

    #[error("token has no blocks")]
    EmptyToken,
}
