//! A single signed block in a biscuit-style token: facts, rules,
//! checks, and policies, the same signature-elision discipline as the
//! SJT backend.

use crate::check::{Check, Policy};
use crate::fact::Fact;
use crate::rule::Rule;
use dct_core::principal::PrincipalId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiscuitBlock {
    pub delegation_id: String,
    pub contract_id: String,
    pub parent_delegation_id: String,
    pub issuer: PrincipalId,
    pub delegatee: PrincipalId,
    pub chain_depth: u32,
    pub max_chain_depth: u32,
    pub max_budget_microcents: u64,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub revocation_id: String,
    pub facts: Vec<Fact>,
    pub rules: Vec<Rule>,
    pub checks: Vec<Check>,
    pub policies: Vec<Policy>,
    pub signature: String,
}

#[derive(Serialize)]
pub(crate) struct SignablePayload<'a> {
    pub delegation_id: &'a str,
    pub contract_id: &'a str,
    pub parent_delegation_id: &'a str,
    pub issuer: &'a str,
    pub delegatee: &'a str,
    pub chain_depth: u32,
    pub max_chain_depth: u32,
    pub max_budget_microcents: u64,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub revocation_id: &'a str,
    pub facts: &'a [Fact],
    pub rules: &'a [Rule],
    pub checks: &'a [Check],
    pub policies: &'a [Policy],
}

impl BiscuitBlock {
    pub(crate) fn signable(&self) -> SignablePayload<'_> {
        SignablePayload {
            delegation_id: &self.delegation_id,
            contract_id: &self.contract_id,
            parent_delegation_id: &self.parent_delegation_id,
            issuer: &self.issuer,
            delegatee: &self.delegatee,
            chain_depth: self.chain_depth,
            max_chain_depth: self.max_chain_depth,
            max_budget_microcents: self.max_budget_microcents,
            expires_at: self.expires_at,
            revocation_id: &self.revocation_id,
            facts: &self.facts,
            rules: &self.rules,
            checks: &self.checks,
            policies: &self.policies,
        }
    }

    /// Every capability fact this block declares, as
    /// `(namespace, action, resource)` triples.
    pub fn capability_facts(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.facts.iter().filter(|f| f.name == "capability" && f.args.len() == 3).map(|f| {
            (f.args[0].as_str(), f.args[1].as_str(), f.args[2].as_str())
        })
    }
}
