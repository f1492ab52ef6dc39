//! Native primitives
//!
//! A primitive is a Rust function dispatched directly by the solver instead
//! of searching clauses. It receives a [`PrimitiveCall`] giving access to
//! the goal's arguments, the current bindings and the listener, and returns
//! a continuation code like any other goal: it calls
//! [`PrimitiveCall::succeed`] once per solution and returns
//! [`Code::CONTINUE`] to fail.
//!
//! Primitives live in a [`PrimitiveRegistry`] owned by the caller. Terms are
//! normalized against the registry so that calls carry their primitive's
//! [`PrimitiveId`] and skip the lookup.

use crate::code::Code;
use crate::solver::{Listener, Scope, Solver};
use prolog_core::{normalize, Arity, Bindings, Frame, PrimitiveTable};
use prolog_term::{symbol, PrimitiveId, Signature, Symbol, Term, TermError};
use std::collections::HashMap;
use std::fmt;

/// A native predicate
pub trait Primitive: Send + Sync {
    fn call(&self, call: &mut PrimitiveCall<'_, '_>) -> Code;
}

impl<F> Primitive for F
where
    F: Fn(&mut PrimitiveCall<'_, '_>) -> Code + Send + Sync,
{
    fn call(&self, call: &mut PrimitiveCall<'_, '_>) -> Code {
        self(call)
    }
}

/// One invocation of a primitive
pub struct PrimitiveCall<'c, 'l> {
    solver: &'c Solver<'c>,
    goal: &'c Term,
    scope: Scope,
    bindings: &'c Bindings,
    listener: &'c mut Listener<'l>,
}

impl<'c, 'l> PrimitiveCall<'c, 'l> {
    pub(crate) fn new(
        solver: &'c Solver<'c>,
        goal: &'c Term,
        scope: Scope,
        bindings: &'c Bindings,
        listener: &'c mut Listener<'l>,
    ) -> Self {
        PrimitiveCall {
            solver,
            goal,
            scope,
            bindings,
            listener,
        }
    }

    pub fn solver(&self) -> &Solver<'c> {
        self.solver
    }

    pub fn goal(&self) -> &Term {
        self.goal
    }

    pub fn args(&self) -> &[Term] {
        self.goal.args()
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Frame the goal's arguments live in
    pub fn frame(&self) -> Frame {
        self.scope.frame
    }

    pub fn bindings(&self) -> &Bindings {
        self.bindings
    }

    /// Raw argument `index`, failing fast when out of range
    pub fn arg(&self, index: usize) -> Result<&Term, TermError> {
        match self.goal.as_struct() {
            Some(node) => node.arg(index),
            None => Err(TermError::ArgumentOutOfRange {
                functor: self.goal.to_string(),
                arity: 0,
                index,
            }),
        }
    }

    /// Argument `index` after following variable bindings
    pub fn deref(&self, index: usize) -> Result<(&Term, Frame), TermError> {
        let arg = self.arg(index)?;
        Ok(self.bindings.deref(arg, self.scope.frame))
    }

    /// Argument `index` with every bound variable substituted
    pub fn value(&self, index: usize) -> Result<Term, TermError> {
        let arg = self.arg(index)?;
        Ok(self.bindings.reify_in(arg, self.scope.frame))
    }

    /// Unify two arguments of the goal
    pub fn unify_args(&self, a: usize, b: usize) -> Result<Option<Bindings>, TermError> {
        let frame = self.scope.frame;
        Ok(self.bindings.unify_in(self.arg(a)?, frame, self.arg(b)?, frame))
    }

    /// Unify argument `index` with a term whose variables are absolute,
    /// such as a constant or a value reified from the current bindings
    pub fn unify_value(&self, index: usize, value: &Term) -> Result<Option<Bindings>, TermError> {
        Ok(self
            .bindings
            .unify_in(self.arg(index)?, self.scope.frame, value, 0))
    }

    /// Unify argument `index` with a renamed copy of `term`: its variables
    /// are renumbered and given freshly allocated slots
    pub fn unify_fresh(&self, index: usize, term: &Term) -> Result<Option<Bindings>, TermError> {
        let arg = self.arg(index)?;
        let copy = normalize(term, self.solver.registry());
        let (base, next) = self.bindings.allocate(copy.var_bound());
        Ok(next.unify_in(arg, self.scope.frame, &copy, base))
    }

    /// Structural identity of two arguments under the current bindings
    pub fn identical(&self, a: usize, b: usize) -> Result<bool, TermError> {
        let frame = self.scope.frame;
        Ok(self
            .bindings
            .identical(self.arg(a)?, frame, self.arg(b)?, frame))
    }

    /// Report one solution
    pub fn succeed(&mut self, bindings: &Bindings) -> Code {
        (self.listener)(bindings)
    }

    /// Report a solution without adding bindings
    pub fn proceed(&mut self) -> Code {
        (self.listener)(self.bindings)
    }

    /// Report a solution if unification produced one, otherwise fail
    pub fn succeed_with(&mut self, bindings: Option<Bindings>) -> Code {
        match bindings {
            Some(next) => (self.listener)(&next),
            None => Code::CONTINUE,
        }
    }

    /// Solve `goal` (living in `frame`) under the current bindings at a
    /// private cut level, reporting to `listener` instead of the caller's
    /// continuation
    pub fn solve_isolated(&self, goal: &Term, frame: Frame, listener: &mut Listener<'_>) -> Code {
        let (level, inner) = self.scope.enter();
        self.solver
            .solve_scoped(goal, inner.in_frame(frame), self.bindings, listener)
            .absorb(level)
    }
}

struct Entry {
    name: Symbol,
    arity: Arity,
    primitive: Box<dyn Primitive>,
}

/// Registry of native primitives keyed by name and arity
#[derive(Default)]
pub struct PrimitiveRegistry {
    entries: Vec<Entry>,
    index: HashMap<(Symbol, Arity), PrimitiveId>,
}

impl PrimitiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function as a primitive. Registering the same name and
    /// arity again replaces the previous primitive and keeps its id.
    pub fn register<F>(&mut self, name: &str, arity: Arity, primitive: F) -> PrimitiveId
    where
        F: Fn(&mut PrimitiveCall<'_, '_>) -> Code + Send + Sync + 'static,
    {
        self.register_boxed(name, arity, Box::new(primitive))
    }

    pub fn register_boxed(
        &mut self,
        name: &str,
        arity: Arity,
        primitive: Box<dyn Primitive>,
    ) -> PrimitiveId {
        let name = symbol(name);
        if let Some(&id) = self.index.get(&(name, arity)) {
            tracing::debug!(%name, %arity, "replacing primitive");
            self.entries[id.index()].primitive = primitive;
            return id;
        }
        let id = PrimitiveId::new(self.entries.len() as u32);
        self.entries.push(Entry {
            name,
            arity,
            primitive,
        });
        self.index.insert((name, arity), id);
        id
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&dyn Primitive> {
        self.entries.get(id.index()).map(|entry| entry.primitive.as_ref())
    }

    /// Find the primitive for a goal signature: exact arity first, then
    /// variadic
    pub fn lookup_signature(&self, signature: Signature) -> Option<PrimitiveId> {
        self.lookup(signature.name, Arity::Exact(signature.arity))
            .or_else(|| self.lookup(signature.name, Arity::Variadic))
    }

    /// Primitive for a goal with `signature`. An attached id is trusted only
    /// when its entry is registered under that name and arity here;
    /// otherwise the signature is looked up.
    pub fn resolve(
        &self,
        attached: Option<PrimitiveId>,
        signature: Signature,
    ) -> Option<&dyn Primitive> {
        attached
            .filter(|&id| self.entry_matches(id, signature))
            .or_else(|| self.lookup_signature(signature))
            .and_then(|id| self.get(id))
    }

    fn entry_matches(&self, id: PrimitiveId, signature: Signature) -> bool {
        self.entries.get(id.index()).is_some_and(|entry| {
            entry.name == signature.name
                && match entry.arity {
                    Arity::Exact(n) => n == signature.arity,
                    Arity::Variadic => true,
                }
        })
    }

    pub fn contains(&self, name: &str, arity: Arity) -> bool {
        self.index.contains_key(&(symbol(name), arity))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PrimitiveTable for PrimitiveRegistry {
    fn lookup(&self, name: Symbol, arity: Arity) -> Option<PrimitiveId> {
        self.index.get(&(name, arity)).copied()
    }
}

impl fmt::Debug for PrimitiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.entries
                    .iter()
                    .map(|entry| format!("{}/{}", entry.name, entry.arity)),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn succeed(call: &mut PrimitiveCall<'_, '_>) -> Code {
        let bindings = call.bindings().clone();
        call.succeed(&bindings)
    }

    fn fail(_call: &mut PrimitiveCall<'_, '_>) -> Code {
        Code::CONTINUE
    }

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut registry = PrimitiveRegistry::new();
        let a = registry.register("a", Arity::Exact(1), succeed);
        let b = registry.register("b", Arity::Variadic, fail);
        assert_eq!(a, PrimitiveId::new(0));
        assert_eq!(b, PrimitiveId::new(1));
        assert_eq!(registry.len(), 2);
        assert!(registry.get(a).is_some());
        assert!(registry.get(PrimitiveId::new(9)).is_none());
    }

    #[test]
    fn test_reregistering_keeps_id() {
        let mut registry = PrimitiveRegistry::new();
        let first = registry.register("p", Arity::Exact(2), succeed);
        let second = registry.register("p", Arity::Exact(2), fail);
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_prefers_exact_arity() {
        let mut registry = PrimitiveRegistry::new();
        let variadic = registry.register("write", Arity::Variadic, succeed);
        let unary = registry.register("write", Arity::Exact(1), succeed);
        assert_eq!(registry.lookup_signature(Signature::new("write", 1)), Some(unary));
        assert_eq!(registry.lookup_signature(Signature::new("write", 3)), Some(variadic));
        assert_eq!(registry.lookup_signature(Signature::new("print", 1)), None);
        assert!(registry.contains("write", Arity::Variadic));
    }

    #[test]
    fn test_debug_lists_signatures() {
        let mut registry = PrimitiveRegistry::new();
        registry.register("nl", Arity::Exact(0), succeed);
        registry.register("format", Arity::Variadic, succeed);
        assert_eq!(format!("{:?}", registry), r#"["nl/0", "format/*"]"#);
    }
}
