//! Chain store trait and in-memory implementation.
//!
//! The trait is `async_trait` purely so a future persistent backend can
//! slot in without changing call sites; [`MemoryChainStore`] never
//! actually awaits anything, mirroring this workspace's existing
//! `EntityStore`/`MemoryEntityStore` split.

use crate::delegation::{Delegation, DelegationStatus};
use crate::error::{ChainError, Result};
use async_trait::async_trait;
use dct_core::ids::SENTINEL_DELEGATION_ID;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[async_trait]
pub trait ChainStore: Send + Sync {
    async fn put(&self, delegation: Delegation) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Delegation>>;
    async fn get_children(&self, id: &str) -> Result<Vec<Delegation>>;
    async fn update_status(
        &self,
        id: &str,
        status: DelegationStatus,
        attestation_id: Option<String>,
    ) -> Result<()>;

    /// Walk parent links from `id` to the sentinel root, leaf-to-root order.
    async fn get_chain(&self, id: &str) -> Result<Vec<Delegation>>;

    /// Validate invariant 1 of the data model along the full chain
    /// rooted at `id`; first violation wins.
    async fn verify_chain(&self, id: &str) -> Result<()>;
}

pub struct MemoryChainStore {
    delegations: RwLock<HashMap<String, Delegation>>,
    children: RwLock<HashMap<String, Vec<String>>>,
}

impl MemoryChainStore {
    pub fn new() -> Self {
        Self {
            delegations: RwLock::new(HashMap::new()),
            children: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryChainStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainStore for MemoryChainStore {
    async fn put(&self, delegation: Delegation) -> Result<()> {
        let mut delegations = self.delegations.write();
        let mut children = self.children.write();
        if !delegation.is_root() {
            children
                .entry(delegation.parent_delegation_id.clone())
                .or_default()
                .retain(|c| c != &delegation.delegation_id);
            children
                .entry(delegation.parent_delegation_id.clone())
                .or_default()
                .push(delegation.delegation_id.clone());
        }
        delegations.insert(delegation.delegation_id.clone(), delegation);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Delegation>> {
        Ok(self.delegations.read().get(id).cloned())
    }

    async fn get_children(&self, id: &str) -> Result<Vec<Delegation>> {
        let children = self.children.read();
        let delegations = self.delegations.read();
        Ok(children
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|cid| delegations.get(cid).cloned())
            .collect())
    }

    async fn update_status(
        &self,
        id: &str,
        status: DelegationStatus,
        attestation_id: Option<String>,
    ) -> Result<()> {
        let mut delegations = self.delegations.write();
        let delegation = delegations
            .get_mut(id)
            .ok_or_else(|| ChainError::NotFound(id.to_string()))?;
        delegation.status = status;
        if attestation_id.is_some() {
            delegation.attestation_id = attestation_id;
        }
        Ok(())
    }

    async fn get_chain(&self, id: &str) -> Result<Vec<Delegation>> {
        let delegations = self.delegations.read();
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = id.to_string();

        loop {
            if !visited.insert(current.clone()) {
                return Err(ChainError::CycleDetected(id.to_string()));
            }
            let delegation = delegations
                .get(&current)
                .ok_or_else(|| ChainError::NotFound(current.clone()))?;
            let parent = delegation.parent_delegation_id.clone();
            chain.push(delegation.clone());
            if parent == SENTINEL_DELEGATION_ID {
                break;
            }
            if !delegations.contains_key(&parent) {
                return Err(ChainError::MissingParent {
                    delegation: current,
                    parent,
                });
            }
            current = parent;
        }

        Ok(chain)
    }

    async fn verify_chain(&self, id: &str) -> Result<()> {
        let chain = self.get_chain(id).await?;
        // chain is leaf-to-root; walk pairs (child, parent)
        for pair in chain.windows(2) {
            let (child, parent) = (&pair[0], &pair[1]);
            if parent.to != child.from {
                return Err(ChainError::InvariantViolated {
                    delegation: child.delegation_id.clone(),
                    detail: format!(
                        "parent.to ({}) != child.from ({})",
                        parent.to, child.from
                    ),
                });
            }
            if child.depth != parent.depth + 1 {
                return Err(ChainError::InvariantViolated {
                    delegation: child.delegation_id.clone(),
                    detail: format!(
                        "child.depth ({}) != parent.depth + 1 ({})",
                        child.depth,
                        parent.depth + 1
                    ),
                });
            }
            if child.contract_id != parent.contract_id {
                return Err(ChainError::InvariantViolated {
                    delegation: child.delegation_id.clone(),
                    detail: "contractId differs between parent and child".to_string(),
                });
            }
        }
        Ok(())
    }
}
