//! `SjtToken`: an ordered chain of blocks, created via `create_dct` and
//! extended via `attenuate_dct`. Attenuation is tightened at creation
//! time: a widening request is refused before any signing happens, per
//! the open question this workspace resolved in favor of the stricter
//! behavior (re-checked defensively again at verify time in
//! [`crate::verify::verify_dct`]).

use crate::block::SjtBlock;
use crate::error::{Result, SjtError};
use dct_core::capability::{is_subset, Capability};
use dct_core::ids::{new_delegation_id, SENTINEL_DELEGATION_ID};
use dct_crypto::{sign_object, verify_object_signature, KeyPair, PublicKey};
use dct_revocation::fresh_revocation_id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SjtToken(pub Vec<SjtBlock>);

impl SjtToken {
    pub fn last(&self) -> Option<&SjtBlock> {
        self.0.last()
    }

    pub fn root(&self) -> Option<&SjtBlock> {
        self.0.first()
    }
}

pub struct CreateParams {
    pub contract_id: String,
    pub delegatee: PublicKey,
    pub capabilities: Vec<Capability>,
    pub max_budget_microcents: u64,
    pub max_chain_depth: u32,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// `createDCT`: constructs and signs block 0.
pub fn create_dct(issuer: &KeyPair, params: CreateParams) -> Result<SjtToken> {
    let mut block = SjtBlock {
        delegation_id: new_delegation_id(),
        contract_id: params.contract_id,
        parent_delegation_id: SENTINEL_DELEGATION_ID.to_string(),
        issuer: issuer.principal_id(),
        delegatee: params.delegatee.to_principal_id(),
        capabilities: params.capabilities,
        max_budget_microcents: params.max_budget_microcents,
        chain_depth: 0,
        max_chain_depth: params.max_chain_depth,
        expires_at: params.expires_at,
        revocation_id: fresh_revocation_id(),
        signature: String::new(),
    };
    block.signature = sign_object(issuer, &block.signable())?;
    tracing::debug!(delegation_id = %block.delegation_id, issuer = %block.issuer, "root DCT block created");
    Ok(SjtToken(vec![block]))
}

pub struct AttenuateParams {
    pub delegatee: PublicKey,
    /// `None` inherits the previous block's capabilities unchanged.
    pub capabilities: Option<Vec<Capability>>,
    pub max_budget_microcents: u64,
    /// `None` inherits the previous block's expiration unchanged.
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// `attenuateDCT`: verifies the last block's signature under
/// `attenuator`'s public key, then appends a strictly narrower block
/// signed by `attenuator`.
pub fn attenuate_dct(
    token: &SjtToken,
    attenuator: &KeyPair,
    params: AttenuateParams,
) -> Result<SjtToken> {
    let prev = token.0.last().ok_or(SjtError::EmptyToken)?;

    let ok = verify_object_signature(attenuator.public_key(), &prev.signable(), &prev.signature)?;
    if !ok || attenuator.principal_id() != prev.delegatee {
        return Err(dct_crypto::CryptoError::MalformedBytes(
            "attenuator is not the previous block's delegatee, or signature invalid".to_string(),
        )
        .into());
    }

    let capabilities = params.capabilities.unwrap_or_else(|| prev.capabilities.clone());
    if !is_subset(&capabilities, &prev.capabilities) {
        return Err(SjtError::AttenuationViolation {
            field: "capabilities",
            parent: format!("{:?}", prev.capabilities),
            requested: format!("{capabilities:?}"),
        });
    }

    if params.max_budget_microcents > prev.max_budget_microcents {
        return Err(SjtError::AttenuationViolation {
            field: "max_budget_microcents",
            parent: prev.max_budget_microcents.to_string(),
            requested: params.max_budget_microcents.to_string(),
        });
    }

    let expires_at = params.expires_at.unwrap_or(prev.expires_at);
    if expires_at > prev.expires_at {
        return Err(SjtError::AttenuationViolation {
            field: "expires_at",
            parent: prev.expires_at.to_rfc3339(),
            requested: expires_at.to_rfc3339(),
        });
    }

    let mut block = SjtBlock {
        delegation_id: new_delegation_id(),
        contract_id: prev.contract_id.clone(),
        parent_delegation_id: prev.delegation_id.clone(),
        issuer: attenuator.principal_id(),
        delegatee: params.delegatee.to_principal_id(),
        capabilities,
        max_budget_microcents: params.max_budget_microcents,
        chain_depth: prev.chain_depth + 1,
        max_chain_depth: prev.max_chain_depth,
        expires_at,
        revocation_id: fresh_revocation_id(),
        signature: String::new(),
    };

    if block.chain_depth > block.max_chain_depth {
        return Err(SjtError::AttenuationViolation {
            field: "chain_depth",
            parent: prev.max_chain_depth.to_string(),
            requested: block.chain_depth.to_string(),
        });
    }

    block.signature = sign_object(attenuator, &block.signable())?;
    tracing::debug!(
        delegation_id = %block.delegation_id,
        parent = %block.parent_delegation_id,
        depth = block.chain_depth,
        "DCT attenuated"
    );

    let mut blocks = token.0.clone();
    blocks.push(block);
    Ok(SjtToken(blocks))
}
