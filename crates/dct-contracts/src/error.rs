use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContractError>;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error(transparent)]
    Crypto(#[from] dct_crypto::CryptoError),

    #[error("unknown check function: {0}")]
    UnknownCheckFunction(String),

    #[error("check function {name} already registered")]
    CheckFunctionAlreadyRegistered { name: String },

    #[error("invalid check parameters for {name}: {detail}")]
    InvalidCheckParams { name: String, detail: String },
}
