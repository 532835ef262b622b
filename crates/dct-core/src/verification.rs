//! Input to, and successful output of, `verifyDCT` — shared by both
//! backends so callers can treat them interchangeably.

use crate::principal::PrincipalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationContext {
    pub resource: String,
    pub operation: String,
    pub now: DateTime<Utc>,
    pub spent_microcents: u64,
    pub root_public_key: PrincipalId,
}

/// What a successful `verifyDCT` call authorizes: the remaining budget
/// after `context.spent_microcents` is deducted from the last block's
/// cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizedScope {
    pub remaining_budget_microcents: u64,
}
