//! `verifyDCT` for the Datalog backend. Structural checks mirror the
//! SJT backend exactly (same [`DenialReason`] taxonomy); the additional
//! check/policy evaluation realizes capability matching as Datalog
//! rather than as special-cased Rust.

use crate::block::BiscuitBlock;
use crate::check::PolicyEffect;
use crate::engine::{Evaluator, EvaluatorConfig};
use crate::fact::Fact;
use crate::rule::{Atom, Rule};
use crate::term::Term;
use crate::token::BiscuitToken;
use dct_core::capability::{is_subset, Capability};
use dct_core::denial::DenialReason;
use dct_core::verification::{AuthorizedScope, VerificationContext};
use dct_crypto::{verify_object_signature, PublicKey};
use dct_revocation::RevocationList;

pub type VerifyResult = std::result::Result<AuthorizedScope, DenialReason>;

fn authorizer_facts(context: &VerificationContext) -> Vec<Fact> {
    vec![
        Fact::new("operation", vec![context.operation.clone()]),
        Fact::new("resource", vec![context.resource.clone()]),
        Fact::new("now", vec![context.now.to_rfc3339()]),
        Fact::new("spent", vec![context.spent_microcents.to_string()]),
        Fact::new("root", vec![context.root_public_key.clone()]),
    ]
}

fn capabilities_of(block: &BiscuitBlock) -> Vec<Capability> {
    block.capability_facts().map(|(ns, act, res)| Capability::new(ns, act, res)).collect()
}

/// The Datalog realization of §4.7's capability match: `authorized()`
/// derives iff some `capability(ns, act, res)` fact lines up with the
/// authorizer's `operation`/`resource` facts, either by exact resource
/// match or by the `**` wildcard.
fn capability_authorization_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            Atom::new("authorized", vec![]),
            vec![
                Atom::new("capability", vec![Term::var("ns"), Term::var("act"), Term::var("res")]),
                Atom::new("operation", vec![Term::var("act")]),
                Atom::new("resource", vec![Term::var("res")]),
            ],
        ),
        Rule::new(
            Atom::new("authorized", vec![]),
            vec![
                Atom::new("capability", vec![Term::var("ns2"), Term::var("act2"), Term::lit("**")]),
                Atom::new("operation", vec![Term::var("act2")]),
            ],
        ),
    ]
}

pub async fn verify_dct(
    token: &BiscuitToken,
    context: &VerificationContext,
    revocations: &dyn RevocationList,
    evaluator_config: EvaluatorConfig,
) -> VerifyResult {
    let result = verify_dct_inner(token, context, revocations, evaluator_config).await;
    if let Err(reason) = &result {
        tracing::warn!(reason = ?reason, "biscuit DCT denied");
    }
    result
}

async fn verify_dct_inner(
    token: &BiscuitToken,
    context: &VerificationContext,
    revocations: &dyn RevocationList,
    evaluator_config: EvaluatorConfig,
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
        let issuer_key = PublicKey::from_principal_id(&next.issuer)
            .map_err(|e| DenialReason::Malformed { detail: e.to_string() })?;
        let ok = verify_object_signature(&issuer_key, &next.signable(), &next.signature)
            .map_err(|e| DenialReason::Malformed { detail: e.to_string() })?;
        if !ok {
            return Err(DenialReason::BadSignature { block: i + 1 });
        }
    }
    {
        let root_key = PublicKey::from_principal_id(&root.issuer)
            .map_err(|e| DenialReason::Malformed { detail: e.to_string() })?;
        let ok = verify_object_signature(&root_key, &root.signable(), &root.signature)
            .map_err(|e| DenialReason::Malformed { detail: e.to_string() })?;
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
            if !is_subset(&capabilities_of(block), &capabilities_of(prev)) {
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

    let mut facts: Vec<Fact> = authorizer_facts(context);
    let mut rules = Vec::new();
    for block in &token.0 {
        facts.extend(block.facts.iter().cloned());
        rules.extend(block.rules.iter().cloned());
    }
    let evaluator = Evaluator::new(evaluator_config);
    let derived = evaluator
        .evaluate(facts, &rules)
        .map_err(|e| DenialReason::Malformed { detail: e.to_string() })?;

    // Capability authorization is scoped to the last block's own facts
    // rather than the `facts`/`rules` union above: that union accumulates
    // every ancestor's capability facts across the whole chain, and
    // reusing it here would let a wide root capability authorize a
    // narrowed leaf even after attenuation. `facts`/`rules` is correct
    // for checks/policies (which are meant to hold chain-wide) but not
    // for the capability match.
    let authorizer_rules = capability_authorization_rules();
    let authorizer_derived = evaluator
        .evaluate(authorizer_facts(context).into_iter().chain(last.facts.iter().cloned()).collect(), &authorizer_rules)
        .map_err(|e| DenialReason::Malformed { detail: e.to_string() })?;
    if !authorizer_derived.contains(&Fact::new("authorized", Vec::<String>::new())) {
        return Err(DenialReason::CapabilityUnmatched);
    }

    for (block_index, block) in token.0.iter().enumerate() {
        for (check_index, check) in block.checks.iter().enumerate() {
            if !evaluator.check_passes(check, &derived) {
                return Err(DenialReason::CheckFailed {
                    block: block_index,
                    index: check_index,
                });
            }
        }
    }

    let all_policies: Vec<_> = token.0.iter().flat_map(|b| b.policies.iter().cloned()).collect();
    if !all_policies.is_empty() {
        match evaluator.decide_policy(&all_policies, &derived) {
            Some((_, PolicyEffect::Allow)) => {}
            Some((i, PolicyEffect::Deny)) => return Err(DenialReason::PolicyDenied { index: Some(i) }),
            None => return Err(DenialReason::PolicyDenied { index: None }),
        }
    }

    if context.spent_microcents > last.max_budget_microcents {
        return Err(DenialReason::BudgetExhausted);
    }

    tracing::debug!(delegation_id = %last.delegation_id, "biscuit DCT verified");
    Ok(AuthorizedScope {
        remaining_budget_microcents: last.max_budget_microcents - context.spent_microcents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{Check, Policy};
    use crate::rule::{Atom, Rule};
    use crate::term::Term;
    use crate::token::{attenuate_dct, create_dct, AttenuateParams, CreateParams};
    use dct_core::capability::Capability;
    use dct_crypto::KeyPair;
    use dct_revocation::MemoryRevocationList;

    fn scenario() -> (KeyPair, KeyPair, KeyPair, BiscuitToken) {
        let issuer = KeyPair::generate();
        let mid = KeyPair::generate();
        let leaf = KeyPair::generate();
        let root = create_dct(
            &issuer,
            CreateParams {
                contract_id: "con_1".to_string(),
                delegatee: mid.public_key().clone(),
                capabilities: vec![Capability::new("test", "read", "**")],
                max_budget_microcents: 100_000,
                max_chain_depth: 5,
                expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
                rules: vec![],
                checks: vec![],
                policies: vec![],
            },
        )
        .unwrap();
        let attenuated = attenuate_dct(
            &root,
            &mid,
            AttenuateParams {
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
        (issuer, mid, leaf, attenuated)
    }

    fn context(issuer: &KeyPair) -> VerificationContext {
        VerificationContext {
            resource: "anything".to_string(),
            operation: "read".to_string(),
            now: chrono::Utc::now(),
            spent_microcents: 0,
            root_public_key: issuer.principal_id(),
        }
    }

    #[tokio::test]
    async fn happy_path_matches_sjt_result_shape() {
        let (issuer, _mid, _leaf, token) = scenario();
        let revocations = MemoryRevocationList::new();
        let scope = verify_dct(&token, &context(&issuer), &revocations, EvaluatorConfig::default())
            .await
            .unwrap();
        assert_eq!(scope.remaining_budget_microcents, 50_000);
    }

    #[tokio::test]
    async fn hand_crafted_widened_block_is_denied_at_verify_time() {
        // A block built by calling attenuate_dct can never widen
        // capabilities (it enforces the subset rule before signing), so
        // this constructs block 1 directly to prove verify_dct catches a
        // widening attacker who skips that API entirely.
        let issuer = KeyPair::generate();
        let mid = KeyPair::generate();
        let leaf = KeyPair::generate();
        let root = create_dct(
            &issuer,
            CreateParams {
                contract_id: "con_1".to_string(),
                delegatee: mid.public_key().clone(),
                capabilities: vec![Capability::new("test", "read", "report.pdf")],
                max_budget_microcents: 100_000,
                max_chain_depth: 5,
                expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
                rules: vec![],
                checks: vec![],
                policies: vec![],
            },
        )
        .unwrap();
        let root_block = &root.0[0];
        let mut widened = crate::block::BiscuitBlock {
            delegation_id: "del_forged".to_string(),
            contract_id: root_block.contract_id.clone(),
            parent_delegation_id: root_block.delegation_id.clone(),
            issuer: root_block.delegatee.clone(),
            delegatee: leaf.public_key().to_principal_id(),
            chain_depth: root_block.chain_depth + 1,
            max_chain_depth: root_block.max_chain_depth,
            max_budget_microcents: root_block.max_budget_microcents,
            expires_at: root_block.expires_at,
            revocation_id: dct_revocation::fresh_revocation_id(),
            facts: vec![Fact::new(
                "capability",
                vec!["test".to_string(), "read".to_string(), "**".to_string()],
            )],
            rules: vec![],
            checks: vec![],
            policies: vec![],
            signature: String::new(),
        };
        widened.signature = dct_crypto::sign_object(&mid, &widened.signable()).unwrap();
        let forged = BiscuitToken(vec![root_block.clone(), widened]);

        let revocations = MemoryRevocationList::new();
        let err = verify_dct(&forged, &context(&issuer), &revocations, EvaluatorConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err, DenialReason::CapabilityUnmatched);
    }

    #[tokio::test]
    async fn mismatched_operation_is_denied() {
        let (issuer, _mid, _leaf, token) = scenario();
        let revocations = MemoryRevocationList::new();
        let mut ctx = context(&issuer);
        ctx.operation = "write".to_string();
        let err = verify_dct(&token, &ctx, &revocations, EvaluatorConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err, DenialReason::CapabilityUnmatched);
    }

    #[tokio::test]
    async fn failing_check_is_reported_with_block_and_index() {
        let issuer = KeyPair::generate();
        let mid = KeyPair::generate();
        let token = create_dct(
            &issuer,
            CreateParams {
                contract_id: "con_1".to_string(),
                delegatee: mid.public_key().clone(),
                capabilities: vec![Capability::new("test", "read", "**")],
                max_budget_microcents: 100_000,
                max_chain_depth: 5,
                expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
                rules: vec![],
                checks: vec![Check {
                    rules: vec![Rule::new(
                        Atom::new("ok", vec![]),
                        vec![Atom::new("role", vec![Term::lit("admin")])],
                    )],
                }],
                policies: vec![],
            },
        )
        .unwrap();
        let revocations = MemoryRevocationList::new();
        let err = verify_dct(&token, &context(&issuer), &revocations, EvaluatorConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err, DenialReason::CheckFailed { block: 0, index: 0 });
    }

    #[tokio::test]
    async fn deny_policy_is_reported_with_index() {
        let issuer = KeyPair::generate();
        let mid = KeyPair::generate();
        let token = create_dct(
            &issuer,
            CreateParams {
                contract_id: "con_1".to_string(),
                delegatee: mid.public_key().clone(),
                capabilities: vec![Capability::new("test", "read", "**")],
                max_budget_microcents: 100_000,
                max_chain_depth: 5,
                expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
                rules: vec![],
                checks: vec![],
                policies: vec![Policy {
                    effect: PolicyEffect::Deny,
                    rule: Rule::fact_rule(Atom::new("deny_all", vec![])),
                }],
            },
        )
        .unwrap();
        let revocations = MemoryRevocationList::new();
        let err = verify_dct(&token, &context(&issuer), &revocations, EvaluatorConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err, DenialReason::PolicyDenied { index: Some(0) });
    }
}
