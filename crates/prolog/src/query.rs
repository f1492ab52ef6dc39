//! Queries and solutions
//!
//! A [`Query`] is a normalized goal bound to an engine. It is a restartable,
//! lazy sequence: every consuming method runs the search from scratch and
//! stops it as soon as the consumer has seen enough.

use crate::engine::Engine;
use prolog_core::Bindings;
use prolog_solver::Code;
use prolog_term::{Symbol, Term};
use std::collections::HashSet;
use std::fmt;
use std::ops::ControlFlow;

/// Bindings of the query's named variables for one solution
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    bindings: Vec<(Symbol, Term)>,
}

impl Solution {
    /// Value of the variable called `name`
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings
            .iter()
            .find(|(var, _)| var.as_str() == name)
            .map(|(_, value)| value)
    }

    /// Variables in order of first occurrence in the goal
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.bindings.iter().map(|(var, value)| (var.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bindings.is_empty() {
            return write!(f, "true");
        }
        for (i, (var, value)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", var, value)?;
        }
        Ok(())
    }
}

pub struct Query<'e> {
    engine: &'e Engine,
    goal: Term,
    /// Named variables of the goal, in first-occurrence order
    variables: Vec<(Symbol, Term)>,
}

impl<'e> Query<'e> {
    pub(crate) fn new(engine: &'e Engine, goal: Term) -> Self {
        let variables = named_variables(&goal);
        Query {
            engine,
            goal,
            variables,
        }
    }

    /// The normalized goal
    pub fn goal(&self) -> &Term {
        &self.goal
    }

    /// Names of the variables reported in each solution
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(name, _)| name.as_str())
    }

    /// Feed solutions to `f` until it breaks or the search is exhausted.
    /// Returns the number of solutions delivered.
    pub fn for_each<F>(&self, mut f: F) -> usize
    where
        F: FnMut(Solution) -> ControlFlow<()>,
    {
        let mut delivered = 0;
        let code = self.engine.run(&self.goal, &mut |bindings: &Bindings| {
            delivered += 1;
            match f(self.solution(bindings)) {
                ControlFlow::Continue(()) => Code::CONTINUE,
                ControlFlow::Break(()) => Code::ABORT,
            }
        });
        tracing::debug!(goal = %self.goal, solutions = delivered, aborted = code.is_abort(), "query finished");
        delivered
    }

    pub fn first(&self) -> Option<Solution> {
        let mut first = None;
        self.for_each(|solution| {
            first = Some(solution);
            ControlFlow::Break(())
        });
        first
    }

    /// Up to `limit` solutions
    pub fn take(&self, limit: usize) -> Vec<Solution> {
        let mut solutions = Vec::new();
        if limit == 0 {
            return solutions;
        }
        self.for_each(|solution| {
            solutions.push(solution);
            if solutions.len() >= limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        solutions
    }

    pub fn all(&self) -> Vec<Solution> {
        let mut solutions = Vec::new();
        self.for_each(|solution| {
            solutions.push(solution);
            ControlFlow::Continue(())
        });
        solutions
    }

    pub fn count(&self) -> usize {
        self.for_each(|_| ControlFlow::Continue(()))
    }

    pub fn exists(&self) -> bool {
        self.first().is_some()
    }

    fn solution(&self, bindings: &Bindings) -> Solution {
        Solution {
            bindings: self
                .variables
                .iter()
                .map(|(name, var)| (*name, bindings.reify(var)))
                .collect(),
        }
    }
}

/// Named variables of a normalized goal. Names starting with `_` are
/// treated as don't-care variables and left out.
fn named_variables(goal: &Term) -> Vec<(Symbol, Term)> {
    fn walk(term: &Term, seen: &mut HashSet<u32>, out: &mut Vec<(Symbol, Term)>) {
        match term {
            Term::Atomic(_) => {}
            Term::Var(var) => {
                if let Some(slot) = var.index() {
                    if !var.name().starts_with('_') && seen.insert(slot) {
                        out.push((var.name(), term.clone()));
                    }
                }
            }
            Term::Struct(node) => {
                if node.has_vars() {
                    for arg in node.args() {
                        walk(arg, seen, out);
                    }
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(goal, &mut HashSet::new(), &mut out);
    out
}
