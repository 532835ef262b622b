//! Naive forward-chaining evaluator: apply every rule against the
//! current fact set until fixed point, bounded by a documented
//! iteration/fact cap so a malicious or malformed rule set cannot spin
//! forever.

use crate::check::{Check, Policy, PolicyEffect};
use crate::error::{DatalogError, Result};
use crate::rule::{Atom, Constraint, Rule};
use crate::term::Term;
use crate::fact::Fact;
use std::collections::{HashMap, HashSet};

type Bindings = HashMap<String, String>;

#[derive(Debug, Clone, Copy)]
pub struct EvaluatorConfig {
    pub max_iterations: usize,
    pub max_facts: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            max_facts: 10_000,
        }
    }
}

pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// Runs rules to a fixed point starting from `facts`, returning the
    /// full derived fact set (including the seed facts).
    pub fn evaluate(&self, facts: Vec<Fact>, rules: &[Rule]) -> Result<HashSet<Fact>> {
        let mut facts: HashSet<Fact> = facts.into_iter().collect();
        for iteration in 0..self.config.max_iterations {
            let mut new_facts = Vec::new();
            for rule in rules {
                for bindings in solve_body(&rule.body, &rule.constraints, &facts) {
                    let derived = substitute_atom(&rule.head, &bindings);
                    if !facts.contains(&derived) {
                        new_facts.push(derived);
                    }
                }
            }
            if new_facts.is_empty() {
                tracing::debug!(iterations = iteration, facts = facts.len(), "datalog evaluation reached fixed point");
                return Ok(facts);
            }
            for fact in new_facts {
                facts.insert(fact);
            }
            if facts.len() > self.config.max_facts {
                return Err(DatalogError::FactCapExceeded {
                    cap: self.config.max_facts,
                });
            }
        }
        Err(DatalogError::IterationCapExceeded {
            cap: self.config.max_iterations,
        })
    }

    /// A check passes if at least one of its rules' bodies is
    /// satisfiable against the (already fixed-point) fact set.
    pub fn check_passes(&self, check: &Check, facts: &HashSet<Fact>) -> bool {
        check
            .rules
            .iter()
            .any(|rule| !solve_body(&rule.body, &rule.constraints, facts).is_empty())
    }

    /// Evaluates ordered policies; the first whose body is satisfiable
    /// decides. Returns `None` if no policy matched (caller treats this
    /// as deny-by-default).
    pub fn decide_policy<'a>(&self, policies: &'a [Policy], facts: &HashSet<Fact>) -> Option<(usize, PolicyEffect)> {
        policies.iter().enumerate().find_map(|(i, policy)| {
            let satisfied = !solve_body(&policy.rule.body, &policy.rule.constraints, facts).is_empty();
            satisfied.then_some((i, policy.effect))
        })
    }
}

fn substitute_term(term: &Term, bindings: &Bindings) -> String {
    match term {
        Term::Lit(value) => value.clone(),
        Term::Var(name) => bindings.get(name).cloned().unwrap_or_default(),
    }
}

fn substitute_atom(atom: &Atom, bindings: &Bindings) -> Fact {
    Fact::new(
        atom.name.clone(),
        atom.args.iter().map(|t| substitute_term(t, bindings)).collect(),
    )
}

fn constraints_hold(constraints: &[Constraint], bindings: &Bindings) -> bool {
    constraints.iter().all(|c| match c {
        Constraint::Eq(a, b) => substitute_term(a, bindings) == substitute_term(b, bindings),
        Constraint::Neq(a, b) => substitute_term(a, bindings) != substitute_term(b, bindings),
    })
}

/// All complete bindings that satisfy the conjunction of `body` atoms
/// against `facts`, subject to `constraints`. Backtracking search,
/// left to right.
fn solve_body(body: &[Atom], constraints: &[Constraint], facts: &HashSet<Fact>) -> Vec<Bindings> {
    let mut results = Vec::new();
    solve_rec(body, facts, HashMap::new(), &mut results);
    results.retain(|b| constraints_hold(constraints, b));
    results
}

fn solve_rec(body: &[Atom], facts: &HashSet<Fact>, bindings: Bindings, out: &mut Vec<Bindings>) {
    let Some((atom, rest)) = body.split_first() else {
        out.push(bindings);
        return;
    };
    for fact in facts.iter().filter(|f| f.name == atom.name && f.args.len() == atom.args.len()) {
        if let Some(extended) = unify(atom, fact, &bindings) {
            solve_rec(rest, facts, extended, out);
        }
    }
}

fn unify(atom: &Atom, fact: &Fact, bindings: &Bindings) -> Option<Bindings> {
    let mut extended = bindings.clone();
    for (term, value) in atom.args.iter().zip(&fact.args) {
        match term {
            Term::Lit(lit) => {
                if lit != value {
                    return None;
                }
            }
            Term::Var(name) => match extended.get(name) {
                Some(existing) if existing != value => return None,
                Some(_) => {}
                None => {
                    extended.insert(name.clone(), value.clone());
                }
            },
        }
    }
    Some(extended)
}
