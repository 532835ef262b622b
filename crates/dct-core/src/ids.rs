//! Identifier conventions shared by every DCT record.
//!
//! Delegation, contract, revocation, sub-task, and attestation IDs are
//! all generated the same way: a v4 UUID rendered without hyphens,
//! prefixed per the record kind. None of these carry a secrecy
//! requirement, only uniqueness, so they are drawn from `uuid`'s
//! default RNG rather than the cryptographic RNG used for keypairs.

use uuid::Uuid;

/// Sentinel parent-delegation-id meaning "no parent" (this is a root delegation).
pub const SENTINEL_DELEGATION_ID: &str = "del_000000000000";

fn new_id(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4().simple())
}

pub fn new_delegation_id() -> String {
    new_id("del_")
}

pub fn new_contract_id() -> String {
    new_id("con_")
}

pub fn new_revocation_id() -> String {
    new_id("rev_")
}

pub fn new_subtask_id() -> String {
    new_id("sub_")
}

pub fn new_attestation_id() -> String {
    new_id("att_")
}

pub fn is_sentinel_delegation(id: &str) -> bool {
    id == SENTINEL_DELEGATION_ID
}
