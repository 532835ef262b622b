//! A single signed block in a signed-JSON DCT. Block 0 is root-signed
//! by the issuer; each later block is signed by the previous block's
//! delegatee, narrowing authority.

use dct_core::capability::Capability;
use dct_core::principal::PrincipalId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SjtBlock {
    pub delegation_id: String,
    pub contract_id: String,
    pub parent_delegation_id: String,
    pub issuer: PrincipalId,
    pub delegatee: PrincipalId,
    pub capabilities: Vec<Capability>,
    pub max_budget_microcents: u64,
    pub chain_depth: u32,
    pub max_chain_depth: u32,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub revocation_id: String,
    pub signature: String,
}

/// Everything but `signature` — the bytes a block's signature covers.
#[derive(Serialize)]
pub(crate) struct SignablePayload<'a> {
    pub delegation_id: &'a str,
    pub contract_id: &'a str,
    pub parent_delegation_id: &'a str,
    pub issuer: &'a str,
    pub delegatee: &'a str,
    pub capabilities: &'a [Capability],
    pub max_budget_microcents: u64,
    pub chain_depth: u32,
    pub max_chain_depth: u32,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub revocation_id: &'a str,
}

impl SjtBlock {
    pub(crate) fn signable(&self) -> SignablePayload<'_> {
        SignablePayload {
            delegation_id: &self.delegation_id,
            contract_id: &self.contract_id,
            parent_delegation_id: &self.parent_delegation_id,
            issuer: &self.issuer,
            delegatee: &self.delegatee,
            capabilities: &self.capabilities,
            max_budget_microcents: self.max_budget_microcents,
            chain_depth: self.chain_depth,
            max_chain_depth: self.max_chain_depth,
            expires_at: self.expires_at,
            revocation_id: &self.revocation_id,
        }
    }
}
