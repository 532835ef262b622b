//! Revocation list trait and in-memory implementation.

use crate::entry::{RevocationEntry, RevocationScope};
use crate::error::{RevocationError, Result};
use async_trait::async_trait;
use dct_core::clock::Clock;
use dct_core::ids::new_revocation_id;
use dct_crypto::{verify_object_signature, KeyPair, PublicKey};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[async_trait]
pub trait RevocationList: Send + Sync {
    /// Insert a revocation entry after verifying its own signature.
    async fn add(&self, entry: RevocationEntry) -> Result<()>;

    /// Insert an entry without verifying its signature. Reserved for
    /// trusted bootstrapping (loading a revocation list from a source
    /// already authenticated by other means).
    fn add_trusted(&self, entry: RevocationEntry);

    /// O(1) membership check.
    fn is_revoked(&self, revocation_id: &str) -> bool;

    /// Emit and insert one `chain`-scoped revocation entry per id,
    /// signed by `signer`.
    async fn cascade_revoke(
        &self,
        signer: &KeyPair,
        clock: &dyn Clock,
        ids: &[String],
    ) -> Result<Vec<RevocationEntry>>;

    fn to_entries(&self) -> Vec<RevocationEntry>;
}

pub struct MemoryRevocationList {
    entries: RwLock<HashMap<String, RevocationEntry>>,
    ids: RwLock<HashSet<String>>,
}

impl MemoryRevocationList {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ids: RwLock::new(HashSet::new()),
        }
    }

    pub fn from_entries(entries: Vec<RevocationEntry>) -> Result<Self> {
        let list = Self::new();
        for entry in entries {
            list.add_trusted(entry);
        }
        Ok(list)
    }

    fn insert(&self, entry: RevocationEntry) {
        self.ids.write().insert(entry.revocation_id.clone());
        self.entries
            .write()
            .insert(entry.revocation_id.clone(), entry);
    }
}

impl Default for MemoryRevocationList {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationList for MemoryRevocationList {
    async fn add(&self, entry: RevocationEntry) -> Result<()> {
        if self.is_revoked(&entry.revocation_id) {
            return Err(RevocationError::AlreadyExists(entry.revocation_id));
        }
        let pub_key = PublicKey::from_principal_id(&entry.revoked_by)?;
        let ok = verify_object_signature(&pub_key, &entry.signable(), &entry.signature)?;
        if !ok {
            return Err(RevocationError::InvalidSignature(entry.revocation_id));
        }
        tracing::info!(revocation_id = %entry.revocation_id, scope = ?entry.scope, "revocation added");
        self.insert(entry);
        Ok(())
    }

    fn add_trusted(&self, entry: RevocationEntry) {
        self.insert(entry);
    }

    fn is_revoked(&self, revocation_id: &str) -> bool {
        self.ids.read().contains(revocation_id)
    }

    async fn cascade_revoke(
        &self,
        signer: &KeyPair,
        clock: &dyn Clock,
        ids: &[String],
    ) -> Result<Vec<RevocationEntry>> {
        let mut created = Vec::with_capacity(ids.len());
        for id in ids {
            let entry = RevocationEntry {
                revocation_id: id.clone(),
                revoked_by: signer.principal_id(),
                revoked_at: clock.now_utc(),
                scope: RevocationScope::Chain,
                signature: String::new(),
            };
            let signature = dct_crypto::sign_object(signer, &entry.signable())?;
            let signed = RevocationEntry {
                signature,
                ..entry
            };
            self.insert(signed.clone());
            created.push(signed);
        }
        tracing::info!(count = created.len(), "cascade revoke completed");
        Ok(created)
    }

    fn to_entries(&self) -> Vec<RevocationEntry> {
        self.entries.read().values().cloned().collect()
    }
}

/// Convenience for generating a fresh revocation id for a new block,
/// not tied to any particular list instance.
pub fn fresh_revocation_id() -> String {
    new_revocation_id()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_entry(signer: &KeyPair, scope: RevocationScope) -> RevocationEntry {
        let mut entry = RevocationEntry {
            revocation_id: fresh_revocation_id(),
            revoked_by: signer.principal_id(),
            revoked_at: chrono::Utc::now(),
            scope,
            signature: String::new(),
        };
        entry.signature = dct_crypto::sign_object(signer, &entry.signable()).unwrap();
        entry
    }

    #[tokio::test]
    async fn add_accepts_a_validly_signed_entry() {
        let signer = KeyPair::generate();
        let list = MemoryRevocationList::new();
        let entry = sign_entry(&signer, RevocationScope::Block);
        let id = entry.revocation_id.clone();
        list.add(entry).await.unwrap();
        assert!(list.is_revoked(&id));
    }

    #[tokio::test]
    async fn add_rejects_a_forged_entry() {
        let signer = KeyPair::generate();
        let impostor = KeyPair::generate();
        let list = MemoryRevocationList::new();
        let mut entry = sign_entry(&signer, RevocationScope::Block);
        // claim to be revoked_by signer, but actually signed by impostor
        entry.signature = dct_crypto::sign_object(&impostor, &entry.signable()).unwrap();
        let err = list.add(entry).await.unwrap_err();
        assert!(matches!(err, RevocationError::InvalidSignature(_)));
    }

    #[tokio::test]
    async fn cascade_revoke_inserts_one_chain_scoped_entry_per_id() {
        let signer = KeyPair::generate();
        let list = MemoryRevocationList::new();
        let ids = vec!["del_a".to_string(), "del_b".to_string()];
        let created = list
            .cascade_revoke(&signer, &dct_core::clock::SystemClock, &ids)
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        for entry in &created {
            assert_eq!(entry.scope, RevocationScope::Chain);
            assert!(list.is_revoked(&entry.revocation_id));
        }
    }

    #[tokio::test]
    async fn cascade_revoke_stamps_revoked_at_from_the_injected_clock() {
        let signer = KeyPair::generate();
        let list = MemoryRevocationList::new();
        let clock = dct_core::clock::FixedClock::new(
            chrono::DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
        );
        let created = list
            .cascade_revoke(&signer, &clock, &["del_a".to_string()])
            .await
            .unwrap();
        assert_eq!(created[0].revoked_at, clock.now_utc());
    }

    #[tokio::test]
    async fn unknown_id_is_not_revoked() {
        let list = MemoryRevocationList::new();
        assert!(!list.is_revoked("rev_nonexistent"));
    }

    #[test]
    fn from_entries_round_trips_via_to_entries() {
        let signer = KeyPair::generate();
        let entry = {
            let mut e = RevocationEntry {
                revocation_id: fresh_revocation_id(),
                revoked_by: signer.principal_id(),
                revoked_at: chrono::Utc::now(),
                scope: RevocationScope::Block,
                signature: String::new(),
            };
            e.signature = dct_crypto::sign_object(&signer, &e.signable()).unwrap();
            e
        };
        let id = entry.revocation_id.clone();
        let list = MemoryRevocationList::from_entries(vec![entry]).unwrap();
        assert!(list.is_revoked(&id));
        assert_eq!(list.to_entries().len(), 1);
    }
}
