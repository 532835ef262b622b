//! Crate-level error umbrella.
//!
//! Individual `dct-*` crates define their own `thiserror` enums scoped
//! to their module; this type exists for callers that want to collapse
//! everything into one error and propagate with `?`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DctCoreError {
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("invalid task constraints: {0}")]
    InvalidConstraints(String),
}
