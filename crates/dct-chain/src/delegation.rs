//! A single delegation record, owned by the chain store.

use dct_core::ids::SENTINEL_DELEGATION_ID;
use dct_core::principal::PrincipalId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelegationStatus {
    Active,
    Completed,
    Revoked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delegation {
    pub delegation_id: String,
    pub parent_delegation_id: String,
    pub contract_id: String,
    pub from: PrincipalId,
    pub to: PrincipalId,
    pub depth: u32,
    pub status: DelegationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestation_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Delegation {
    pub fn is_root(&self) -> bool {
        self.parent_delegation_id == SENTINEL_DELEGATION_ID
    }
}
