//! Checks gate a token on "does at least one rule derive a satisfying
//! fact"; policies pick the first matching allow/deny.

use crate::rule::Rule;
use serde::{Deserialize, Serialize};

/// At least one rule in `rules` must produce a satisfying binding
/// against the evaluator's derived fact set for the check to pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Check {
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyEffect {
    Allow,
    Deny,
}

/// An ordered allow/deny gate: the rule fires if its body is satisfied
/// by the derived fact set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub effect: PolicyEffect,
    pub rule: Rule,
}
