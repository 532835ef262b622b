//! Signed task contracts and the check-function registry that judges
//! their output.

pub mod checks;
pub mod contract;
pub mod error;

pub use checks::{CheckFunctionRegistry, CheckResult};
pub use contract::TaskContract;
pub use error::ContractError;
