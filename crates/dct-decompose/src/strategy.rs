//! Decomposition strategies: turn a parent contract into an ordered
//! list of sub-tasks.

use crate::subtask::SubTask;
use dct_contracts::TaskContract;
use dct_core::ids::new_subtask_id;

/// Produces an ordered list of [`SubTask`]s from a parent contract.
/// `fractions` gives each sub-task's share of the parent's budget; the
/// caller is responsible for keeping the sum at or below 1.0 (enforced
/// later by [`crate::validate::validate_plan`]). `deadline_offset_ms`,
/// when given, places every sub-task's deadline at
/// `parent.created_at + deadline_offset_ms` instead of inheriting the
/// parent's own deadline.
pub trait DecompositionStrategy {
    fn decompose(
        &self,
        parent: &TaskContract,
        fractions: &[f64],
        deadline_offset_ms: Option<i64>,
    ) -> Vec<SubTask>;
}

fn sub_task_deadline(
    parent: &TaskContract,
    deadline_offset_ms: Option<i64>,
) -> chrono::DateTime<chrono::Utc> {
    match deadline_offset_ms {
        Some(offset_ms) => parent.created_at + chrono::Duration::milliseconds(offset_ms),
        None => parent.constraints.deadline,
    }
}

/// Each sub-task depends on the one before it; budgets are independent
/// fractions of the parent's.
pub struct Sequential;

impl DecompositionStrategy for Sequential {
    fn decompose(
        &self,
        parent: &TaskContract,
        fractions: &[f64],
        deadline_offset_ms: Option<i64>,
    ) -> Vec<SubTask> {
        let deadline = sub_task_deadline(parent, deadline_offset_ms);
        let mut sub_tasks = Vec::with_capacity(fractions.len());
        let mut previous_id: Option<String> = None;
        for (i, fraction) in fractions.iter().enumerate() {
            let sub_task_id = new_subtask_id();
            let budget = (parent.constraints.max_budget_microcents as f64 * fraction).floor() as u64;
            sub_tasks.push(SubTask {
                sub_task_id: sub_task_id.clone(),
                description: format!("{} (part {})", parent.task.description, i + 1),
                capabilities: parent.task.required_capabilities.clone(),
                budget_microcents: budget,
                deadline,
                depends_on: previous_id.into_iter().collect(),
            });
            previous_id = Some(sub_task_id);
        }
        sub_tasks
    }
}

/// Sub-tasks are independent; no dependency edges.
pub struct Parallel;

impl DecompositionStrategy for Parallel {
    fn decompose(
        &self,
        parent: &TaskContract,
        fractions: &[f64],
        deadline_offset_ms: Option<i64>,
    ) -> Vec<SubTask> {
        let deadline = sub_task_deadline(parent, deadline_offset_ms);
        fractions
            .iter()
            .enumerate()
            .map(|(i, fraction)| {
                let budget =
                    (parent.constraints.max_budget_microcents as f64 * fraction).floor() as u64;
                SubTask {
                    sub_task_id: new_subtask_id(),
                    description: format!("{} (part {})", parent.task.description, i + 1),
                    capabilities: parent.task.required_capabilities.clone(),
                    budget_microcents: budget,
                    deadline,
                    depends_on: Vec::new(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dct_core::capability::Capability;
    use dct_core::task::{TaskConstraints, TaskSpec, VerificationSpec};
    use serde_json::json;

    fn parent() -> TaskContract {
        TaskContract {
            contract_id: "con_test".to_string(),
            issuer: "issuer".to_string(),
            task: TaskSpec {
                description: "big job".to_string(),
                inputs: json!({}),
                required_capabilities: vec![Capability::new("files", "read", "**")],
            },
            verification: VerificationSpec {
                name: "equals".to_string(),
                params: json!({}),
            },
            constraints: TaskConstraints {
                max_budget_microcents: 100_000,
                deadline: chrono::Utc::now() + chrono::Duration::hours(1),
                max_chain_depth: None,
            },
            created_at: chrono::Utc::now(),
            signature: "sig".to_string(),
        }
    }

    #[test]
    fn sequential_chains_dependencies() {
        let sub_tasks = Sequential.decompose(&parent(), &[0.5, 0.5], None);
        assert_eq!(sub_tasks.len(), 2);
        assert!(sub_tasks[0].depends_on.is_empty());
        assert_eq!(sub_tasks[1].depends_on, vec![sub_tasks[0].sub_task_id.clone()]);
        assert_eq!(sub_tasks[0].budget_microcents, 50_000);
    }

    #[test]
    fn parallel_has_no_dependencies() {
        let sub_tasks = Parallel.decompose(&parent(), &[0.3, 0.3, 0.3], None);
        assert!(sub_tasks.iter().all(|s| s.depends_on.is_empty()));
    }

    #[test]
    fn missing_offset_falls_back_to_parent_deadline() {
        let parent = parent();
        let sub_tasks = Sequential.decompose(&parent, &[1.0], None);
        assert_eq!(sub_tasks[0].deadline, parent.constraints.deadline);
    }

    #[test]
    fn offset_is_computed_from_parent_created_at() {
        let parent = parent();
        let sub_tasks = Parallel.decompose(&parent, &[1.0], Some(30_000));
        assert_eq!(sub_tasks[0].deadline, parent.created_at + chrono::Duration::milliseconds(30_000));
        assert_ne!(sub_tasks[0].deadline, parent.constraints.deadline);
    }
}
