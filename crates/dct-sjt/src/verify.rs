//! `verifyDCT` for the signed-JSON backend: a fixed sequence of checks,
//! first failure wins.

use crate::token::SjtToken;
use dct_core::capability::is_subset;
use dct_core::denial::DenialReason;
use dct_core::verification::{AuthorizedScope, VerificationContext};
use dct_crypto::{verify_object_signature, PublicKey};
use dct_revocation::RevocationList;

pub type VerifyResult = std::result::Result<AuthorizedScope, DenialReason>;

/// `verifyDCT`. Denial ordering exactly follows: wrong root, then
/// signature/chain-of-custody per block, then depth/budget/expiration
/// monotonicity per block, then expiration, then revocation, then
/// capability match, then budget.
pub async fn verify_dct(
    token: &SjtToken,
    context: &VerificationContext,
    revocations: &dyn RevocationList,
) -> VerifyResult {
    let result = verify_dct_inner(token, context, revocations).await;
    if let Err(reason) = &result {
        tracing::warn!(reason = ?reason, "DCT denied");
    }
    result
}

async fn verify_dct_inner(
    token: &SjtToken,
    context: &VerificationContext,
    revocations: &dyn RevocationList,
) -> VerifyResult {
    let root = token.0.first().ok_or_else(|| DenialReason::Malformed {
        detail: "token has no blocks".to_string(),
    })?;

    if root.issuer != context.root_public_key {
        return Err(DenialReason::WrongRoot);
    }

    for (i, window) in token.0.windows(2).enumerate() {
        let (prev, next) = (&window[0], &window[1]);
        if next.issuer != prev.delegatee {
            return Err(DenialReason::ChainBroken { block: i + 1 });
        }
        let issuer_key = PublicKey::from_principal_id(&next.issuer).map_err(|e| {
            DenialReason::Malformed {
                detail: e.to_string(),
            }
        })?;
        let ok = verify_object_signature(&issuer_key, &next.signable(), &next.signature)
            .map_err(|e| DenialReason::Malformed {
                detail: e.to_string(),
            })?;
        if !ok {
            return Err(DenialReason::BadSignature { block: i + 1 });
        }
    }
    {
        let root_key = PublicKey::from_principal_id(&root.issuer).map_err(|e| DenialReason::Malformed {
            detail: e.to_string(),
        })?;
        let ok = verify_object_signature(&root_key, &root.signable(), &root.signature).map_err(|e| {
            DenialReason::Malformed {
                detail: e.to_string(),
            }
        })?;
        if !ok {
            return Err(DenialReason::BadSignature { block: 0 });
        }
    }

    for (i, block) in token.0.iter().enumerate() {
        if block.chain_depth > block.max_chain_depth {
            return Err(DenialReason::DepthExceeded { block: i });
        }
        if i > 0 {
            let prev = &token.0[i - 1];
            if block.chain_depth != prev.chain_depth + 1 {
                return Err(DenialReason::DepthExceeded { block: i });
            }
            if block.max_chain_depth > prev.max_chain_depth {
                return Err(DenialReason::DepthExceeded { block: i });
            }
            if block.max_budget_microcents > prev.max_budget_microcents {
                return Err(DenialReason::BudgetExhausted);
            }
            if block.expires_at > prev.expires_at {
                return Err(DenialReason::Expired);
            }
            if !is_subset(&block.capabilities, &prev.capabilities) {
                return Err(DenialReason::CapabilityUnmatched);
            }
        }
    }

    let last = token.0.last().expect("checked non-empty above");

    if last.expires_at <= context.now {
        return Err(DenialReason::Expired);
    }

    for block in &token.0 {
        if revocations.is_revoked(&block.revocation_id) {
            return Err(DenialReason::Revoked {
                revocation_id: block.revocation_id.clone(),
            });
        }
    }

    // VerificationContext carries only (operation, resource), not a
    // namespace, so a capability matches when its action and resource
    // match, regardless of which namespace declared it.
    let matched = last
        .capabilities
        .iter()
        .any(|c| c.action == context.operation && (c.resource == "**" || c.resource == context.resource));
    if !matched {
        return Err(DenialReason::CapabilityUnmatched);
    }

    if context.spent_microcents > last.max_budget_microcents {
        return Err(DenialReason::BudgetExhausted);
    }

    tracing::debug!(delegation_id = %last.delegation_id, "DCT verified");
    Ok(AuthorizedScope {
        remaining_budget_microcents: last.max_budget_microcents - context.spent_microcents,
    })
}
