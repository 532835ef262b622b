use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatalogError>;

#[derive(Error, Debug)]
pub enum DatalogError {
    #[error(transparent)]
    Crypto(#[from] dct_crypto::CryptoError),

    #[error("forward-chaining exceeded {cap} iterations without reaching a fixed point")]
    IterationCapExceeded { cap: usize },

    #[error("forward-chaining exceeded {cap} derived facts")]
    FactCapExceeded { cap: usize },

    /// Mirrors the SJT backend's equivalent variant; attenuation
    /// tightening applies identically to both backends.
    #[error("attenuation would widen {field}: parent={parent}, requested={requested}")]
    AttenuationViolation {
        field: &'static str,
        parent: String,
        requested: String,
    },

    #[error("token has no blocks")]
    EmptyToken,
}
