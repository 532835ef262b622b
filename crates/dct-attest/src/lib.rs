//! Signed attestations: a performer's claim of completed work, and a
//! verifier's independent judgement of it.

pub mod attestation;
pub mod error;

pub use attestation::{
    create_completion_attestation, create_verification_attestation, verify_attestation_signature,
    Attestation, AttestationKind, AttestationResult,
};
pub use error::AttestationError;
