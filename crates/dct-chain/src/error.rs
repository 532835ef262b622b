use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChainError>;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("delegation not found: {0}")]
    NotFound(String),

    #[error("delegation already exists: {0}")]
    AlreadyExists(String),

    #[error("cycle detected while walking chain from {0}")]
    CycleDetected(String),

    #[error("missing parent {parent} for delegation {delegation}")]
    MissingParent { delegation: String, parent: String },

    #[error("chain invariant violated at {delegation}: {detail}")]
    InvariantViolated { delegation: String, detail: String },
}
