//! Shared data model for the DCT trust stack.
//!
//! This crate has no cryptography and no I/O. It defines the vocabulary
//! every other `dct-*` crate builds on: principals, capabilities, task
//! specifications, the clock abstraction, and the identifier conventions
//! used throughout delegation chains and tokens.
//!
//! ```
//! use dct_core::capability::Capability;
//!
//! let granted = Capability::new("files", "read", "**");
//! let requested = Capability::new("files", "read", "report.pdf");
//! assert!(granted.authorizes(&requested));
//! ```

pub mod capability;
pub mod clock;
pub mod denial;
pub mod error;
pub mod ids;
pub mod principal;
pub mod task;
pub mod verification;

pub use capability::Capability;
pub use clock::{Clock, FixedClock, SystemClock};
pub use denial::DenialReason;
pub use error::DctCoreError;
pub use principal::{Principal, PrincipalId};
pub use task::{TaskConstraints, TaskSpec, VerificationSpec};
pub use verification::{AuthorizedScope, VerificationContext};
