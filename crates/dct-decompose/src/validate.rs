//! Plan validation: every rule a decomposition must satisfy against its
//! parent contract before the plan can be acted on.

use crate::error::{DecompositionError, Result};
use crate::subtask::SubTask;
use dct_contracts::TaskContract;
use dct_core::capability::is_subset;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Visiting,
    Done,
}

/// Enforces, in order: budget sum, deadlines, capability containment,
/// acyclic dependencies. The first violated rule wins.
pub fn validate_plan(plan: &[SubTask], parent: &TaskContract) -> Result<()> {
    let total_budget: u64 = plan.iter().map(|s| s.budget_microcents).sum();
    if total_budget > parent.constraints.max_budget_microcents {
        return Err(DecompositionError::BudgetExceeded {
            total: total_budget,
            parent: parent.constraints.max_budget_microcents,
        });
    }

    for sub_task in plan {
        if sub_task.deadline > parent.constraints.deadline {
            return Err(DecompositionError::DeadlineExceeded {
                sub_task_id: sub_task.sub_task_id.clone(),
            });
        }
    }

    for sub_task in plan {
        if !is_subset(&sub_task.capabilities, &parent.task.required_capabilities) {
            return Err(DecompositionError::CapabilityNotCovered {
                sub_task_id: sub_task.sub_task_id.clone(),
            });
        }
    }

    check_acyclic(plan)?;

    tracing::debug!(
        contract_id = %parent.contract_id,
        sub_tasks = plan.len(),
        "decomposition plan validated"
    );
    Ok(())
}

fn check_acyclic(plan: &[SubTask]) -> Result<()> {
    let by_id: HashMap<&str, &SubTask> =
        plan.iter().map(|s| (s.sub_task_id.as_str(), s)).collect();
    let mut colors: HashMap<&str, Color> = HashMap::new();

    for sub_task in plan {
        if !colors.contains_key(sub_task.sub_task_id.as_str()) {
            visit(sub_task, &by_id, &mut colors, &mut HashSet::new())?;
        }
    }
    Ok(())
}

fn visit<'a>(
    sub_task: &'a SubTask,
    by_id: &HashMap<&'a str, &'a SubTask>,
    colors: &mut HashMap<&'a str, Color>,
    stack: &mut HashSet<&'a str>,
) -> Result<()> {
    let id = sub_task.sub_task_id.as_str();
    stack.insert(id);
    for dep in &sub_task.depends_on {
        let dep_id = dep.as_str();
        if stack.contains(dep_id) {
            return Err(DecompositionError::CyclicDependency {
                sub_task_id: sub_task.sub_task_id.clone(),
            });
        }
        match colors.get(dep_id) {
            Some(Color::Done) => continue,
            _ => {
                let dep_task = by_id.get(dep_id).ok_or_else(|| DecompositionError::UnknownDependency {
                    sub_task_id: sub_task.sub_task_id.clone(),
                    depends_on: dep.clone(),
                })?;
                visit(dep_task, by_id, colors, stack)?;
            }
        }
    }
    stack.remove(id);
    colors.insert(id, Color::Done);
    Ok(())
}
