//! A single unit of work split out of a parent contract.

use dct_core::capability::Capability;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubTask {
    pub sub_task_id: String,
    pub description: String,
    pub capabilities: Vec<Capability>,
    pub budget_microcents: u64,
    pub deadline: chrono::DateTime<chrono::Utc>,
    /// Sub-task IDs that must complete before this one may start.
    #[serde(default)]
    pub depends_on: Vec<String>,
}
