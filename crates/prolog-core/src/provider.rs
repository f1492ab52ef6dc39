//! Candidate sources consulted by the solver
//!
//! Providers are queried with the goal as it appears in its own frame plus
//! the current bindings, so they can dereference the goal's arguments and
//! skip candidates that cannot match. Pre-filtering is optional: the solver
//! always unifies every candidate it receives.

use crate::clause::Clause;
use crate::context::{Bindings, Frame};
use prolog_term::Term;

/// Source of rules and facts for user predicates
pub trait ClauseProvider {
    /// Clauses that might match `goal`, in the order they should be tried
    fn matching_clauses<'a>(
        &'a self,
        goal: &Term,
        frame: Frame,
        bindings: &Bindings,
    ) -> Box<dyn Iterator<Item = Clause> + 'a>;
}

/// Source of ground data facts, tried by plain unification
pub trait DataFactProvider {
    /// Ground facts that might match `goal`, in the order they should be tried
    fn matching_facts<'a>(
        &'a self,
        goal: &Term,
        frame: Frame,
        bindings: &Bindings,
    ) -> Box<dyn Iterator<Item = Term> + 'a>;
}
