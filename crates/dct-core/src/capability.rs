//! Capability matching and the attenuation subset rule.
//!
//! A capability is a `(namespace, action, resource)` triple. `**` on the
//! resource field matches any resource; there is no other wildcard form.
//! This mirrors the scope-matching idiom used elsewhere in this
//! workspace (action hierarchies over address patterns) but deliberately
//! drops the hierarchy: DCT actions match by exact equality, not by an
//! admin-over-write-over-read lattice, because capability narrowing must
//! be unambiguous across two different token backends.

use serde::{Deserialize, Serialize};

/// Resource wildcard: matches any resource string.
pub const WILDCARD_RESOURCE: &str = "**";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability {
    pub namespace: String,
    pub action: String,
    pub resource: String,
}

impl Capability {
    pub fn new(
        namespace: impl Into<String>,
        action: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            action: action.into(),
            resource: resource.into(),
        }
    }

    /// Does this capability authorize the given request?
    pub fn authorizes(&self, requested: &Capability) -> bool {
        self.namespace == requested.namespace
            && self.action == requested.action
            && (self.resource == WILDCARD_RESOURCE || self.resource == requested.resource)
    }

    /// Does this capability authorize the given `(namespace, action, resource)` request?
    pub fn authorizes_request(&self, namespace: &str, action: &str, resource: &str) -> bool {
        self.namespace == namespace
            && self.action == action
            && (self.resource == WILDCARD_RESOURCE || self.resource == resource)
    }
}

/// A block authorizes a request iff any of its capabilities matches it.
pub fn any_authorizes(capabilities: &[Capability], namespace: &str, action: &str, resource: &str) -> bool {
    capabilities
        .iter()
        .any(|c| c.authorizes_request(namespace, action, resource))
}

/// Subset rule: `narrower` is a subset of `wider` iff every member of
/// `narrower` is authorized by some member of `wider`. An empty
/// `narrower` set is trivially a subset of anything.
pub fn is_subset(narrower: &[Capability], wider: &[Capability]) -> bool {
    narrower
        .iter()
        .all(|n| wider.iter().any(|w| w.authorizes(n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_resource_matches_anything() {
        let cap = Capability::new("files", "read", "**");
        assert!(cap.authorizes_request("files", "read", "a.txt"));
        assert!(cap.authorizes_request("files", "read", "b.txt"));
        assert!(!cap.authorizes_request("files", "write", "a.txt"));
        assert!(!cap.authorizes_request("other", "read", "a.txt"));
    }

    #[test]
    fn exact_resource_matches_only_itself() {
        let cap = Capability::new("files", "read", "a.txt");
        assert!(cap.authorizes_request("files", "read", "a.txt"));
        assert!(!cap.authorizes_request("files", "read", "b.txt"));
    }

    #[test]
    fn subset_rule_allows_narrowing() {
        let wide = vec![Capability::new("files", "read", "**")];
        let narrow = vec![Capability::new("files", "read", "a.txt")];
        assert!(is_subset(&narrow, &wide));
        assert!(!is_subset(&wide, &narrow));
    }

    #[test]
    fn subset_rule_rejects_new_namespace() {
        let wide = vec![Capability::new("files", "read", "**")];
        let extra = vec![
            Capability::new("files", "read", "a.txt"),
            Capability::new("network", "read", "**"),
        ];
        assert!(!is_subset(&extra, &wide));
    }

    #[test]
    fn empty_capability_set_is_always_a_subset() {
        let wide = vec![Capability::new("files", "read", "**")];
        assert!(is_subset(&[], &wide));
        assert!(is_subset(&[], &[]));
    }
}
