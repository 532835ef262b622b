//! The delegation chain store: parent→child linkage between delegations
//! and invariant verification over a chain.

pub mod delegation;
pub mod error;
pub mod store;

pub use delegation::{Delegation, DelegationStatus};
pub use error::ChainError;
pub use store::{ChainStore, MemoryChainStore};
