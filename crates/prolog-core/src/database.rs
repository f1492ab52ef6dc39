//! In-memory clause and fact stores
//!
//! Both stores index by predicate signature and pre-filter candidates on the
//! dereferenced first argument of the goal. Clause order is preserved; data
//! facts keep insertion order and set semantics.
//!
//! # Example
//!
//! ```ignore
//! let mut facts = FactDatabase::new();
//! facts.insert(parse("edge(a, b)"))?;
//! let mut rules = ClauseDatabase::new();
//! rules.add(Clause::rule(head, body, &registry)?);
//! ```

use crate::clause::Clause;
use crate::context::{Bindings, Frame};
use crate::provider::{ClauseProvider, DataFactProvider};
use indexmap::IndexSet;
use prolog_term::{Signature, Term, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Error type for failed fact insertions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// Data facts may not contain variables
    #[error("cannot insert non-ground fact: {fact}")]
    NonGround { fact: String },
    #[error("{fact} is not callable")]
    NotCallable { fact: String },
}

/// Shape of a goal's first argument, used to skip candidates early
enum FirstArg {
    Value(Value),
    Functor(Signature),
    Any,
}

impl FirstArg {
    fn of(goal: &Term, frame: Frame, bindings: &Bindings) -> Self {
        let Some(first) = goal.args().first() else {
            return FirstArg::Any;
        };
        match bindings.deref(first, frame).0 {
            Term::Atomic(value) => FirstArg::Value(value.clone()),
            Term::Struct(node) => FirstArg::Functor(node.signature()),
            Term::Var(_) => FirstArg::Any,
        }
    }

    /// Whether a candidate whose first argument is `arg` could unify
    fn admits(&self, arg: Option<&Term>) -> bool {
        match (self, arg) {
            (FirstArg::Any, _) | (_, None) | (_, Some(Term::Var(_))) => true,
            (FirstArg::Value(v), Some(Term::Atomic(w))) => v == w,
            (FirstArg::Functor(sig), Some(Term::Struct(node))) => *sig == node.signature(),
            _ => false,
        }
    }
}

/// Rules and facts grouped by predicate signature
#[derive(Debug, Clone, Default)]
pub struct ClauseDatabase {
    clauses: HashMap<Signature, Vec<Clause>>,
}

impl ClauseDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clause after the existing clauses of its predicate
    pub fn add(&mut self, clause: Clause) {
        tracing::trace!(predicate = %clause.signature(), "adding clause");
        self.clauses.entry(clause.signature()).or_default().push(clause);
    }

    /// All clauses for a predicate, in insertion order
    pub fn clauses(&self, signature: &Signature) -> &[Clause] {
        self.clauses.get(signature).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of clauses
    pub fn len(&self) -> usize {
        self.clauses.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.values().all(Vec::is_empty)
    }

    pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
        self.clauses.keys()
    }
}

impl ClauseProvider for ClauseDatabase {
    fn matching_clauses<'a>(
        &'a self,
        goal: &Term,
        frame: Frame,
        bindings: &Bindings,
    ) -> Box<dyn Iterator<Item = Clause> + 'a> {
        let Some(signature) = goal.signature() else {
            return Box::new(std::iter::empty());
        };
        let first = FirstArg::of(goal, frame, bindings);
        Box::new(
            self.clauses(&signature)
                .iter()
                .filter(move |clause| first.admits(clause.head().args().first()))
                .cloned(),
        )
    }
}

/// A set of ground facts indexed by predicate signature
#[derive(Debug, Clone, Default)]
pub struct FactDatabase {
    facts: HashMap<Signature, IndexSet<Term>>,
}

impl FactDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a ground fact. Returns `true` if it was not already present.
    pub fn insert(&mut self, fact: Term) -> Result<bool, InsertError> {
        let Some(signature) = fact.signature() else {
            return Err(InsertError::NotCallable {
                fact: fact.to_string(),
            });
        };
        if !fact.is_ground() {
            return Err(InsertError::NonGround {
                fact: fact.to_string(),
            });
        }
        tracing::trace!(predicate = %signature, "inserting fact");
        Ok(self.facts.entry(signature).or_default().insert(fact))
    }

    pub fn contains(&self, fact: &Term) -> bool {
        fact.signature()
            .and_then(|signature| self.facts.get(&signature))
            .map_or(false, |facts| facts.contains(fact))
    }

    /// Facts of one predicate, in insertion order
    pub fn facts(&self, signature: &Signature) -> impl Iterator<Item = &Term> {
        self.facts.get(signature).into_iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.facts.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.values().all(IndexSet::is_empty)
    }
}

impl DataFactProvider for FactDatabase {
    fn matching_facts<'a>(
        &'a self,
        goal: &Term,
        frame: Frame,
        bindings: &Bindings,
    ) -> Box<dyn Iterator<Item = Term> + 'a> {
        let Some(signature) = goal.signature() else {
            return Box::new(std::iter::empty());
        };
        let first = FirstArg::of(goal, frame, bindings);
        Box::new(
            self.facts(&signature)
                .filter(move |fact| first.admits(fact.args().first()))
                .cloned(),
        )
    }
}
