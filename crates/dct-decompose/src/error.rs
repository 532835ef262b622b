use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecompositionError>;

#[derive(Error, Debug)]
pub enum DecompositionError {
    #[error("sub-task budgets sum to {total} microcents, exceeding parent budget {parent}")]
    BudgetExceeded { total: u64, parent: u64 },

    #[error("sub-task {sub_task_id} deadline is after the parent deadline")]
    DeadlineExceeded { sub_task_id: String },

    #[error("sub-task {sub_task_id} requires a capability not covered by the parent contract")]
    CapabilityNotCovered { sub_task_id: String },

    #[error("sub-task dependency graph contains a cycle through {sub_task_id}")]
    CyclicDependency { sub_task_id: String },

    #[error("sub-task {sub_task_id} depends on unknown sub-task {depends_on}")]
    UnknownDependency {
        sub_task_id: String,
        depends_on: String,
    },

    #[error("budget fractions must sum to at most 1.0, got {sum}")]
    InvalidFractions { sum: f64 },
}
