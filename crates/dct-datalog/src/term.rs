//! Datalog terms: either a bound literal or a variable to unify against
//! the fact set. Variables are written with a leading `$` in source
//! form but are represented here as a distinct enum variant rather than
//! a sigil convention baked into a plain string.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Term {
    Var(String),
    Lit(String),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    pub fn lit(value: impl Into<String>) -> Self {
        Term::Lit(value.into())
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }
}
