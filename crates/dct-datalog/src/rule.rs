//! Rules derive new facts from existing ones: `head :- body[]`, with
//! optional equality/inequality constraints on bound variables.

use crate::term::Term;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    pub name: String,
    pub args: Vec<Term>,
}

impl Atom {
    pub fn new(name: impl Into<String>, args: Vec<Term>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    Eq(Term, Term),
    Neq(Term, Term),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub head: Atom,
    pub body: Vec<Atom>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl Rule {
    pub fn new(head: Atom, body: Vec<Atom>) -> Self {
        Self {
            head,
            body,
            constraints: Vec::new(),
        }
    }

    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints = constraints;
        self
    }

    /// A rule with no body is a fact in disguise; useful for checks and
    /// policies that need to reference a literal condition directly.
    pub fn fact_rule(head: Atom) -> Self {
        Self::new(head, Vec::new())
    }
}
