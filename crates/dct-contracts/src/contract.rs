//! `TaskContract`: an issuer-signed statement of a task, its
//! constraints, and how to verify its output.

use dct_core::clock::Clock;
use dct_core::ids::new_contract_id;
use dct_core::principal::PrincipalId;
use dct_core::task::{TaskConstraints, TaskSpec, VerificationSpec};
use dct_crypto::{sign_object, verify_object_signature, KeyPair, PublicKey};
use serde::Serialize;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TaskContract {
    pub contract_id: String,
    pub issuer: PrincipalId,
    pub task: TaskSpec,
    pub verification: VerificationSpec,
    pub constraints: TaskConstraints,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub signature: String,
}

/// Everything but `signature` — the bytes the signature actually covers.
#[derive(Serialize)]
struct SignablePayload<'a> {
    contract_id: &'a str,
    issuer: &'a str,
    task: &'a TaskSpec,
    verification: &'a VerificationSpec,
    constraints: &'a TaskConstraints,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TaskContract {
    fn signable(&self) -> SignablePayload<'_> {
        SignablePayload {
            contract_id: &self.contract_id,
            issuer: &self.issuer,
            task: &self.task,
            verification: &self.verification,
            constraints: &self.constraints,
            created_at: self.created_at,
        }
    }
}

/// `createContract`: assigns a fresh id, stamps `createdAt`, and signs
/// the canonical form.
pub fn create_contract(
    issuer: &KeyPair,
    clock: &dyn Clock,
    task: TaskSpec,
    verification: VerificationSpec,
    constraints: TaskConstraints,
) -> crate::error::Result<TaskContract> {
    let mut contract = TaskContract {
        contract_id: new_contract_id(),
        issuer: issuer.principal_id(),
        task,
        verification,
        constraints,
        created_at: clock.now_utc(),
        signature: String::new(),
    };
    contract.signature = sign_object(issuer, &contract.signable())?;
    tracing::debug!(contract_id = %contract.contract_id, issuer = %contract.issuer, "contract created");
    Ok(contract)
}

/// Re-derives the canonical signing bytes (excluding `signature`) and
/// checks the Ed25519 signature against `issuer_pub_key`.
pub fn verify_contract_signature(
    contract: &TaskContract,
    issuer_pub_key: &PublicKey,
) -> crate::error::Result<bool> {
    Ok(verify_object_signature(
        issuer_pub_key,
        &contract.signable(),
        &contract.signature,
    )?)
}
