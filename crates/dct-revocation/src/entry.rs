//! A single signed revocation record.

use dct_core::principal::PrincipalId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevocationScope {
    /// Revokes a single DCT block.
    Block,
    /// Revokes an entire delegation chain.
    Chain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevocationEntry {
    pub revocation_id: String,
    pub revoked_by: PrincipalId,
    pub revoked_at: chrono::DateTime<chrono::Utc>,
    pub scope: RevocationScope,
    pub signature: String,
}

/// The subset of fields covered by the signature: everything but
/// `signature` itself.
#[derive(Serialize)]
pub(crate) struct SignablePayload<'a> {
    pub revocation_id: &'a str,
    pub revoked_by: &'a str,
    pub revoked_at: chrono::DateTime<chrono::Utc>,
    pub scope: RevocationScope,
}

impl RevocationEntry {
    pub(crate) fn signable(&self) -> SignablePayload<'_> {
        SignablePayload {
            revocation_id: &self.revocation_id,
            revoked_by: &self.revoked_by,
            revoked_at: self.revoked_at,
            scope: self.scope,
        }
    }
}
