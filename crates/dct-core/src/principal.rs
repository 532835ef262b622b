//! Principal identity.
//!
//! A principal's identifier is derived from its Ed25519 public key
//! elsewhere (see `dct-crypto::principal_id`); this crate only defines
//! the shape of the identifier and the principal record, so that
//! `dct-core` can describe delegation and capability without depending
//! on a cryptography crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `base64url(publicKey32)`, 43 characters. Treated as an opaque string
/// here; `dct-crypto` is responsible for deriving and validating it.
pub type PrincipalId = String;

/// An identity, addressed by its Ed25519 public key id, with an optional
/// human-readable name for logging and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Principal {
    pub fn new(id: impl Into<PrincipalId>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn named(id: impl Into<PrincipalId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} ({})", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}
