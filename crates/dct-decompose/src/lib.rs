//! Splitting a contract into sub-tasks and validating the resulting
//! plan against the parent's budget, deadline, and capabilities.

pub mod error;
pub mod strategy;
pub mod subtask;
pub mod validate;

pub use error::DecompositionError;
pub use strategy::{DecompositionStrategy, Parallel, Sequential};
pub use subtask::SubTask;
pub use validate::validate_plan;
