//! `BiscuitToken`: an ordered chain of blocks carrying Datalog facts,
//! rules, checks, and policies. `attenuate_dct` mirrors the SJT
//! backend's creation-time tightening: a narrower block is appended
//! only if it is monotone in every dimension §4.7 constrains.

use crate::block::BiscuitBlock;
use crate::check::{Check, Policy};
use crate::error::{DatalogError, Result};
use crate::fact::Fact;
use crate::rule::Rule;
use dct_core::capability::{is_subset, Capability};
use dct_core::ids::{new_delegation_id, SENTINEL_DELEGATION_ID};
use dct_crypto::{sign_object, verify_object_signature, KeyPair, PublicKey};
use dct_revocation::fresh_revocation_id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiscuitToken(pub Vec<BiscuitBlock>);

impl BiscuitToken {
    pub fn last(&self) -> Option<&BiscuitBlock> {
        self.0.last()
    }

    pub fn root(&self) -> Option<&BiscuitBlock> {
        self.0.first()
    }
}

fn capability_facts(capabilities: &[Capability]) -> Vec<Fact> {
    capabilities
        .iter()
        .map(|c| Fact::new("capability", vec![c.namespace.clone(), c.action.clone(), c.resource.clone()]))
        .collect()
}

fn capabilities_from_block(block: &BiscuitBlock) -> Vec<Capability> {
    block
        .capability_facts()
        .map(|(ns, act, res)| Capability::new(ns, act, res))
        .collect()
}

pub struct CreateParams {
    pub contract_id: String,
    pub delegatee: PublicKey,
    pub capabilities: Vec<Capability>,
    pub max_budget_microcents: u64,
    pub max_chain_depth: u32,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub rules: Vec<Rule>,
    pub checks: Vec<Check>,
    pub policies: Vec<Policy>,
}

pub fn create_dct(issuer: &KeyPair, params: CreateParams) -> Result<BiscuitToken> {
    let mut block = BiscuitBlock {
        delegation_id: new_delegation_id(),
        contract_id: params.contract_id,
        parent_delegation_id: SENTINEL_DELEGATION_ID.to_string(),
        issuer: issuer.principal_id(),
        delegatee: params.delegatee.to_principal_id(),
        chain_depth: 0,
        max_chain_depth: params.max_chain_depth,
        max_budget_microcents: params.max_budget_microcents,
        expires_at: params.expires_at,
        revocation_id: fresh_revocation_id(),
        facts: capability_facts(&params.capabilities),
        rules: params.rules,
        checks: params.checks,
        policies: params.policies,
        signature: String::new(),
    };
    block.signature = sign_object(issuer, &block.signable())?;
    tracing::debug!(delegation_id = %block.delegation_id, issuer = %block.issuer, "root biscuit block created");
    Ok(BiscuitToken(vec![block]))
}

pub struct AttenuateParams {
    pub delegatee: PublicKey,
    /// `None` inherits the previous block's capability facts unchanged.
    pub capabilities: Option<Vec<Capability>>,
    pub max_budget_microcents: u64,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub extra_facts: Vec<Fact>,
    pub rules: Vec<Rule>,
    pub checks: Vec<Check>,
    pub policies: Vec<Policy>,
}

pub fn attenuate_dct(
    token: &BiscuitToken,
    attenuator: &KeyPair,
    params: AttenuateParams,
) -> Result<BiscuitToken> {
    let prev = token.0.last().ok_or(DatalogError::EmptyToken)?;

    let ok = verify_object_signature(attenuator.public_key(), &prev.signable(), &prev.signature)?;
    if !ok || attenuator.principal_id() != prev.delegatee {
        return Err(dct_crypto::CryptoError::MalformedBytes(
            "attenuator is not the previous block's delegatee, or signature invalid".to_string(),
        )
        .into());
    }

    let prev_capabilities = capabilities_from_block(prev);
    let capabilities = params.capabilities.unwrap_or_else(|| prev_capabilities.clone());
    if !is_subset(&capabilities, &prev_capabilities) {
        return Err(DatalogError::AttenuationViolation {
            field: "capabilities",
            parent: format!("{prev_capabilities:?}"),
            requested: format!("{capabilities:?}"),
        });
    }

    if params.max_budget_microcents > prev.max_budget_microcents {
        return Err(DatalogError::AttenuationViolation {
            field: "max_budget_microcents",
            parent: prev.max_budget_microcents.to_string(),
            requested: params.max_budget_microcents.to_string(),
        });
    }

    let expires_at = params.expires_at.unwrap_or(prev.expires_at);
    if expires_at > prev.expires_at {
        return Err(DatalogError::AttenuationViolation {
            field: "expires_at",
            parent: prev.expires_at.to_rfc3339(),
            requested: expires_at.to_rfc3339(),
        });
    }

    let mut facts = capability_facts(&capabilities);
    facts.extend(params.extra_facts);

    let mut block = BiscuitBlock {
        delegation_id: new_delegation_id(),
        contract_id: prev.contract_id.clone(),
        parent_delegation_id: prev.delegation_id.clone(),
        issuer: attenuator.principal_id(),
        delegatee: params.delegatee.to_principal_id(),
        chain_depth: prev.chain_depth + 1,
        max_chain_depth: prev.max_chain_depth,
        max_budget_microcents: params.max_budget_microcents,
        expires_at,
        revocation_id: fresh_revocation_id(),
        facts,
        rules: params.rules,
        checks: params.checks,
        policies: params.policies,
        signature: String::new(),
    };

    if block.chain_depth > block.max_chain_depth {
        return Err(DatalogError::AttenuationViolation {
            field: "chain_depth",
            parent: prev.max_chain_depth.to_string(),
            requested: block.chain_depth.to_string(),
        });
    }

    block.signature = sign_object(attenuator, &block.signable())?;
    tracing::debug!(delegation_id = %block.delegation_id, parent = %block.parent_delegation_id, depth = block.chain_depth, "biscuit token attenuated");

    let mut blocks = token.0.clone();
    blocks.push(block);
    Ok(BiscuitToken(blocks))
}
