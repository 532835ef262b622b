//! Signed attestations binding a completed (or verified) delegation to
//! its contract and delegation IDs.

use dct_core::clock::Clock;
use dct_core::ids::new_attestation_id;
use dct_core::principal::PrincipalId;
use dct_crypto::{sign_object, verify_object_signature, KeyPair, PublicKey};
use serde::{Deserialize, Serialize};

/// Distinguishes a performer's completion claim from a verifier's
/// judgement of it, so one record can never be replayed into the
/// other's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttestationKind {
    Completion,
    Verification,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestationResult {
    pub pass: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_ref: Option<String>,
    #[serde(default)]
    pub metrics: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attestation {
    pub attestation_id: String,
    pub principal_id: PrincipalId,
    pub contract_id: String,
    pub delegation_id: String,
    pub result: AttestationResult,
    #[serde(default)]
    pub child_attestations: Vec<String>,
    pub kind: AttestationKind,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub signature: String,
}

#[derive(Serialize)]
struct SignablePayload<'a> {
    attestation_id: &'a str,
    principal_id: &'a str,
    contract_id: &'a str,
    delegation_id: &'a str,
    result: &'a AttestationResult,
    child_attestations: &'a [String],
    kind: AttestationKind,
    timestamp: chrono::DateTime<chrono::Utc>,
}

impl Attestation {
    fn signable(&self) -> SignablePayload<'_> {
        SignablePayload {
            attestation_id: &self.attestation_id,
            principal_id: &self.principal_id,
            contract_id: &self.contract_id,
            delegation_id: &self.delegation_id,
            result: &self.result,
            child_attestations: &self.child_attestations,
            kind: self.kind,
            timestamp: self.timestamp,
        }
    }
}

fn create_attestation(
    signer: &KeyPair,
    clock: &dyn Clock,
    contract_id: impl Into<String>,
    delegation_id: impl Into<String>,
    result: AttestationResult,
    child_attestations: Vec<String>,
    kind: AttestationKind,
) -> crate::error::Result<Attestation> {
    let mut attestation = Attestation {
        attestation_id: new_attestation_id(),
        principal_id: signer.principal_id(),
        contract_id: contract_id.into(),
        delegation_id: delegation_id.into(),
        result,
        child_attestations,
        kind,
        timestamp: clock.now_utc(),
        signature: String::new(),
    };
    attestation.signature = sign_object(signer, &attestation.signable())?;
    tracing::debug!(
        attestation_id = %attestation.attestation_id,
        ?kind,
        "attestation created"
    );
    Ok(attestation)
}

pub fn create_completion_attestation(
    signer: &KeyPair,
    clock: &dyn Clock,
    contract_id: impl Into<String>,
    delegation_id: impl Into<String>,
    result: AttestationResult,
    child_attestations: Vec<String>,
) -> crate::error::Result<Attestation> {
    create_attestation(
        signer,
        clock,
        contract_id,
        delegation_id,
        result,
        child_attestations,
        AttestationKind::Completion,
    )
}

pub fn create_verification_attestation(
    signer: &KeyPair,
    clock: &dyn Clock,
    contract_id: impl Into<String>,
    delegation_id: impl Into<String>,
    result: AttestationResult,
    child_attestations: Vec<String>,
) -> crate::error::Result<Attestation> {
    create_attestation(
        signer,
        clock,
        contract_id,
        delegation_id,
        result,
        child_attestations,
        AttestationKind::Verification,
    )
}

pub fn verify_attestation_signature(
    attestation: &Attestation,
    signer_pub_key: &PublicKey,
) -> crate::error::Result<bool> {
    Ok(verify_object_signature(
        signer_pub_key,
        &attestation.signable(),
        &attestation.signature,
    )?)
}
