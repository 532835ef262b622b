//! Delegated Capability Token trust infrastructure.
//!
//! An issuer creates a [`TaskContract`](dct_contracts::TaskContract) and a
//! root DCT naming a delegatee. The delegatee may attenuate the DCT
//! (narrowing capabilities, tightening budget, advancing depth) and
//! re-delegate; each step is appended to the [`dct_chain::ChainStore`].
//! Verification dispatches on the token's backend:
//!
//! ```text
//! SerializedDct::Sjt(token)      --verify_dct-->  AuthorizedScope | DenialReason
//! SerializedDct::Biscuit(token)  --verify_dct-->  AuthorizedScope | DenialReason
//! ```
//!
//! Both backends enforce the same capability-subset and
//! budget/expiration-monotonicity rules on attenuation, and produce the
//! same [`DenialReason`] taxonomy on verification failure, so callers
//! can treat them interchangeably.

pub use dct_attest as attest;
pub use dct_breaker as breaker;
pub use dct_chain as chain;
pub use dct_contracts as contracts;
pub use dct_core as core;
pub use dct_crypto as crypto;
pub use dct_datalog as datalog;
pub use dct_decompose as decompose;
pub use dct_revocation as revocation;
pub use dct_sjt as sjt;

use dct_core::denial::DenialReason;
use dct_core::verification::{AuthorizedScope, VerificationContext};
use dct_datalog::{BiscuitToken, EvaluatorConfig};
use dct_revocation::RevocationList;
use dct_sjt::SjtToken;
use serde::{Deserialize, Serialize};

/// The `{format, token}` envelope: a closed sum type over the two
/// backends, dispatched by a `match` rather than dynamic dispatch,
/// since the set of backends is fixed at compile time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "format", content = "token", rename_all = "lowercase")]
pub enum SerializedDct {
    Sjt(SjtToken),
    Biscuit(BiscuitToken),
}

impl SerializedDct {
    pub fn delegation_id(&self) -> Option<&str> {
        match self {
            SerializedDct::Sjt(t) => t.last().map(|b| b.delegation_id.as_str()),
            SerializedDct::Biscuit(t) => t.last().map(|b| b.delegation_id.as_str()),
        }
    }
}

/// Verifies a [`SerializedDct`] regardless of its backend, producing
/// the shared [`AuthorizedScope`]/[`DenialReason`] result. Datalog
/// tokens are evaluated with the default forward-chaining cap; use
/// [`dct_datalog::verify_dct`] directly to override it.
pub async fn verify_dct(
    dct: &SerializedDct,
    context: &VerificationContext,
    revocations: &dyn RevocationList,
) -> Result<AuthorizedScope, DenialReason> {
    match dct {
        SerializedDct::Sjt(token) => dct_sjt::verify_dct(token, context, revocations).await,
        SerializedDct::Biscuit(token) => {
            dct_datalog::verify_dct(token, context, revocations, EvaluatorConfig::default()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dct_core::capability::Capability;
    use dct_crypto::KeyPair;

    #[tokio::test]
    async fn sjt_and_biscuit_agree_on_the_happy_path() {
        let issuer = KeyPair::generate();
        let mid = KeyPair::generate();
        let leaf = KeyPair::generate();
        let expires_at = chrono::Utc::now() + chrono::Duration::hours(1);

        let sjt_root = dct_sjt::create_dct(
            &issuer,
            dct_sjt::CreateParams {
                contract_id: "con_1".to_string(),
                delegatee: mid.public_key().clone(),
                capabilities: vec![Capability::new("test", "read", "**")],
                max_budget_microcents: 100_000,
                max_chain_depth: 5,
                expires_at,
            },
        )
        .unwrap();
        let sjt_leaf = dct_sjt::attenuate_dct(
            &sjt_root,
            &mid,
            dct_sjt::AttenuateParams {
                delegatee: leaf.public_key().clone(),
                capabilities: None,
                max_budget_microcents: 50_000,
                expires_at: None,
            },
        )
        .unwrap();

        let biscuit_root = dct_datalog::create_dct(
            &issuer,
            dct_datalog::CreateParams {
                contract_id: "con_1".to_string(),
                delegatee: mid.public_key().clone(),
                capabilities: vec![Capability::new("test", "read", "**")],
                max_budget_microcents: 100_000,
                max_chain_depth: 5,
                expires_at,
                rules: vec![],
                checks: vec![],
                policies: vec![],
            },
        )
        .unwrap();
        let biscuit_leaf = dct_datalog::attenuate_dct(
            &biscuit_root,
            &mid,
            dct_datalog::AttenuateParams {
                delegatee: leaf.public_key().clone(),
                capabilities: None,
                max_budget_microcents: 50_000,
                expires_at: None,
                extra_facts: vec![],
                rules: vec![],
                checks: vec![],
                policies: vec![],
            },
        )
        .unwrap();

        let context = VerificationContext {
            resource: "anything".to_string(),
            operation: "read".to_string(),
            now: chrono::Utc::now(),
            spent_microcents: 0,
            root_public_key: issuer.principal_id(),
        };
        let revocations = dct_revocation::MemoryRevocationList::new();

        let sjt_result = verify_dct(&SerializedDct::Sjt(sjt_leaf), &context, &revocations).await;
        let biscuit_result =
            verify_dct(&SerializedDct::Biscuit(biscuit_leaf), &context, &revocations).await;

        assert_eq!(sjt_result.is_ok(), biscuit_result.is_ok());
        assert_eq!(sjt_result.unwrap().remaining_budget_microcents, 50_000);
        assert_eq!(biscuit_result.unwrap().remaining_budget_microcents, 50_000);
    }

    #[tokio::test]
    async fn sjt_and_biscuit_agree_on_capability_mismatch() {
        let issuer = KeyPair::generate();
        let mid = KeyPair::generate();
        let expires_at = chrono::Utc::now() + chrono::Duration::hours(1);

        let sjt_root = dct_sjt::create_dct(
            &issuer,
            dct_sjt::CreateParams {
                contract_id: "con_1".to_string(),
                delegatee: mid.public_key().clone(),
                capabilities: vec![Capability::new("test", "read", "**")],
                max_budget_microcents: 100_000,
                max_chain_depth: 5,
                expires_at,
            },
        )
        .unwrap();
        let biscuit_root = dct_datalog::create_dct(
            &issuer,
            dct_datalog::CreateParams {
                contract_id: "con_1".to_string(),
                delegatee: mid.public_key().clone(),
                capabilities: vec![Capability::new("test", "read", "**")],
                max_budget_microcents: 100_000,
                max_chain_depth: 5,
                expires_at,
                rules: vec![],
                checks: vec![],
                policies: vec![],
            },
        )
        .unwrap();

        let context = VerificationContext {
            resource: "anything".to_string(),
            operation: "write".to_string(),
            now: chrono::Utc::now(),
            spent_microcents: 0,
            root_public_key: issuer.principal_id(),
        };
        let revocations = dct_revocation::MemoryRevocationList::new();

        let sjt_err = verify_dct(&SerializedDct::Sjt(sjt_root), &context, &revocations)
            .await
            .unwrap_err();
        let biscuit_err = verify_dct(&SerializedDct::Biscuit(biscuit_root), &context, &revocations)
            .await
            .unwrap_err();
        assert_eq!(sjt_err, biscuit_err);
    }
}
