//! The signed-JSON DCT backend: a linear chain of signed blocks, each
//! one narrower than the last.
//!
//! ```text
//! issuer --root-signs--> [block 0] --mid-signs--> [block 1] --leaf-signs--> [block 2]
//!                         caps={**}                caps⊆{**}               caps⊆caps(1)
//!                         budget=100000             budget≤100000           budget≤budget(1)
//! ```

pub mod block;
pub mod error;
pub mod token;
pub mod verify;

pub use block::SjtBlock;
pub use error::SjtError;
pub use token::{attenuate_dct, create_dct, AttenuateParams, CreateParams, SjtToken};
pub use verify::{verify_dct, VerifyResult};
