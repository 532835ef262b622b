//! Task description, constraints, and the verification reference that
//! judges a task's output.

use crate::capability::Capability;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A free-form task description plus the capabilities required to perform it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    pub description: String,
    #[serde(default)]
    pub inputs: Value,
    pub required_capabilities: Vec<Capability>,
}

/// Budget and timing bounds a contract or sub-task must respect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TaskConstraints {
    pub max_budget_microcents: u64,
    pub deadline: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chain_depth: Option<u32>,
}

/// A named check-function reference plus the parameters it is invoked with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSpec {
    pub name: String,
    #[serde(default)]
    pub params: Value,
}
