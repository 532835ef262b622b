//! The denial taxonomy shared by both DCT backends.
//!
//! `verifyDCT` for the signed-JSON backend and the Datalog backend
//! produce the same set of denial variants so a caller can treat the
//! two backends interchangeably (see the SJT/Datalog interchangeability
//! property in SPEC_FULL.md §8). Check/policy failures are
//! Datalog-specific since SJT has no embedded rule evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DenialReason {
    /// Token structurally invalid: empty block list, missing field, wrong type.
    Malformed { detail: String },
    /// A block's signature does not verify under the claimed issuer key.
    BadSignature { block: usize },
    /// The last block's `expiresAt` is at or before the verification time.
    Expired,
    /// A block's `revocationId` is present in the revocation list.
    Revoked { revocation_id: String },
    /// A block's `chainDepth` exceeds `maxChainDepth`, or depth is not
    /// strictly increasing along the chain.
    DepthExceeded { block: usize },
    /// The requested `(namespace, action, resource)` is not authorized
    /// by the last block's capability set.
    CapabilityUnmatched,
    /// `context.spentMicrocents` exceeds the last block's budget.
    BudgetExhausted,
    /// Block 0's issuer public key does not equal the caller-supplied
    /// `rootPublicKey`.
    WrongRoot,
    /// Block *i*+1's claimed issuer does not equal block *i*'s
    /// delegatee, breaking the chain of custody.
    ChainBroken { block: usize },
    /// A Datalog check failed to find a satisfying rule.
    CheckFailed { block: usize, index: usize },
    /// No Datalog policy matched, or the first match was `deny`.
    PolicyDenied { index: Option<usize> },
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::Malformed { detail } => write!(f, "malformed: {detail}"),
            DenialReason::BadSignature { block } => write!(f, "bad_signature at block {block}"),
            DenialReason::Expired => write!(f, "expired"),
            DenialReason::Revoked { revocation_id } => write!(f, "revoked: {revocation_id}"),
            DenialReason::DepthExceeded { block } => write!(f, "depth_exceeded at block {block}"),
            DenialReason::CapabilityUnmatched => write!(f, "capability_unmatched"),
            DenialReason::BudgetExhausted => write!(f, "budget_exhausted"),
            DenialReason::WrongRoot => write!(f, "wrong_root"),
            DenialReason::ChainBroken { block } => write!(f, "chain_broken at block {block}"),
            DenialReason::CheckFailed { block, index } => {
                write!(f, "check_failed at block {block} index {index}")
            }
            DenialReason::PolicyDenied { index } => match index {
                Some(i) => write!(f, "policy_denied at index {i}"),
                None => write!(f, "policy_denied: no policy matched"),
            },
        }
    }
}

impl std::error::Error for DenialReason {}
