//! Unify context
//!
//! `Bindings` is an immutable value recording the variable bindings
//! accumulated along one search branch. Unification never mutates an
//! existing context: it returns an extended copy, so sibling branches
//! derived from the same ancestor never observe each other's bindings and
//! no trail or undo bookkeeping is needed.
//!
//! # Frames
//!
//! Normalized clauses number their variables from slot 0. Each time a clause
//! is used the solver allocates a fresh frame base, and a variable with slot
//! `s` in that activation lives at absolute slot `base + s`. The top-level
//! goal lives in frame 0, so its variables are their own absolute slots.
//!
//! # Occurs check
//!
//! None is performed: `X = f(X)` succeeds and leaves a self-referential
//! binding. `reify` guards against expanding such a binding forever; other
//! traversals do not.

use prolog_term::{symbol, Term, Var};
use std::collections::HashMap;
use std::sync::Arc;

/// Base slot of a clause activation
pub type Frame = u32;

#[derive(Debug, Clone)]
struct Binding {
    term: Term,
    frame: Frame,
}

/// Persistent binding environment for one search branch
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    slots: im::HashMap<u32, Binding>,
    next_slot: u32,
}

fn key(var: &Var, frame: Frame) -> Option<u32> {
    var.index().map(|index| frame + index)
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty context with the goal's own slots reserved in frame 0
    pub fn for_goal(goal: &Term) -> Self {
        Bindings {
            slots: im::HashMap::new(),
            next_slot: goal.var_bound(),
        }
    }

    /// Number of bound slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// First slot not yet handed out to a frame
    pub fn next_slot(&self) -> u32 {
        self.next_slot
    }

    /// Reserve `count` fresh slots, returning the frame base and the
    /// extended context
    pub fn allocate(&self, count: u32) -> (Frame, Bindings) {
        let base = self.next_slot;
        let mut next = self.clone();
        next.next_slot = base + count;
        (base, next)
    }

    /// Follow variable bindings until reaching a free variable or a
    /// non-variable term
    pub fn deref<'a>(&'a self, term: &'a Term, frame: Frame) -> (&'a Term, Frame) {
        let mut current = term;
        let mut frame = frame;
        while let Term::Var(var) = current {
            match key(var, frame).and_then(|slot| self.slots.get(&slot)) {
                Some(binding) => {
                    current = &binding.term;
                    frame = binding.frame;
                }
                None => break,
            }
        }
        (current, frame)
    }

    fn resolve(&self, term: &Term, frame: Frame) -> (Term, Frame) {
        let (term, frame) = self.deref(term, frame);
        (term.clone(), frame)
    }

    /// Whether the variable is bound in the given frame
    pub fn is_bound(&self, var: &Var, frame: Frame) -> bool {
        key(var, frame).map_or(false, |slot| self.slots.contains_key(&slot))
    }

    /// Unify two terms of the goal frame
    pub fn unify(&self, a: &Term, b: &Term) -> Option<Bindings> {
        self.unify_in(a, 0, b, 0)
    }

    /// Unify `a` in frame `fa` with `b` in frame `fb`.
    ///
    /// Returns the extended context, or `None` when the terms do not unify.
    pub fn unify_in(&self, a: &Term, fa: Frame, b: &Term, fb: Frame) -> Option<Bindings> {
        let mut next = self.clone();
        if next.unify_mut(a, fa, b, fb) {
            Some(next)
        } else {
            None
        }
    }

    fn bind(&mut self, slot: u32, term: Term, frame: Frame) {
        self.slots.insert(slot, Binding { term, frame });
    }

    fn unify_mut(&mut self, a: &Term, fa: Frame, b: &Term, fb: Frame) -> bool {
        let (a, fa) = self.resolve(a, fa);
        let (b, fb) = self.resolve(b, fb);

        match (&a, &b) {
            (Term::Var(va), Term::Var(vb)) => {
                // bind the younger variable to the older one
                match (key(va, fa), key(vb, fb)) {
                    (Some(ka), Some(kb)) if ka > kb => self.bind(ka, b.clone(), fb),
                    (Some(ka), Some(kb)) if ka < kb => self.bind(kb, a.clone(), fa),
                    _ => {}
                }
                true
            }
            (Term::Var(var), _) => {
                if let Some(slot) = key(var, fa) {
                    self.bind(slot, b.clone(), fb);
                }
                true
            }
            (_, Term::Var(var)) => {
                if let Some(slot) = key(var, fb) {
                    self.bind(slot, a.clone(), fa);
                }
                true
            }
            (Term::Atomic(x), Term::Atomic(y)) => x == y,
            (Term::Struct(x), Term::Struct(y)) => {
                if Arc::ptr_eq(x, y) && (fa == fb || !x.has_vars()) {
                    return true;
                }
                if x.functor() != y.functor() || x.arity() != y.arity() {
                    return false;
                }
                x.args()
                    .iter()
                    .zip(y.args())
                    .all(|(p, q)| self.unify_mut(p, fa, q, fb))
            }
            _ => false,
        }
    }

    /// Fully substitute a goal-frame term
    pub fn reify(&self, term: &Term) -> Term {
        self.reify_in(term, 0)
    }

    /// Fully substitute `term` in `frame`.
    ///
    /// Free goal-frame variables are returned as themselves; free variables
    /// of clause frames become fresh `_G<slot>` variables carrying their
    /// absolute slot.
    pub fn reify_in(&self, term: &Term, frame: Frame) -> Term {
        Reifier {
            bindings: self,
            fresh: HashMap::new(),
            expanding: Vec::new(),
        }
        .reify(term, frame)
    }

    /// Structural identity under the current bindings: variables match only
    /// when they resolve to the same slot.
    pub fn identical(&self, a: &Term, fa: Frame, b: &Term, fb: Frame) -> bool {
        let (a, fa) = self.deref(a, fa);
        let (b, fb) = self.deref(b, fb);
        match (a, b) {
            (Term::Var(x), Term::Var(y)) => match (key(x, fa), key(y, fb)) {
                (Some(kx), Some(ky)) => kx == ky,
                _ => Arc::ptr_eq(x, y),
            },
            (Term::Atomic(x), Term::Atomic(y)) => x == y,
            (Term::Struct(x), Term::Struct(y)) => {
                x.functor() == y.functor()
                    && x.arity() == y.arity()
                    && x
                        .args()
                        .iter()
                        .zip(y.args())
                        .all(|(p, q)| self.identical(p, fa, q, fb))
            }
            _ => false,
        }
    }
}

struct Reifier<'b> {
    bindings: &'b Bindings,
    fresh: HashMap<u32, Term>,
    /// Slots whose bindings are currently being expanded
    expanding: Vec<u32>,
}

impl Reifier<'_> {
    fn reify(&mut self, term: &Term, frame: Frame) -> Term {
        match term {
            Term::Atomic(_) => term.clone(),
            Term::Var(var) => {
                let Some(slot) = key(var, frame) else {
                    return term.clone();
                };
                let bindings = self.bindings;
                match bindings.slots.get(&slot) {
                    // cyclic binding: leave the variable unexpanded
                    Some(_) if self.expanding.contains(&slot) => self.free_var(term, slot, frame),
                    Some(binding) => {
                        self.expanding.push(slot);
                        let value = self.reify(&binding.term, binding.frame);
                        self.expanding.pop();
                        value
                    }
                    None => self.free_var(term, slot, frame),
                }
            }
            Term::Struct(node) => {
                if !node.has_vars() {
                    return term.clone();
                }
                let mut changed = false;
                let mut args = Vec::with_capacity(node.arity());
                for arg in node.args() {
                    let value = self.reify(arg, frame);
                    changed |= !value.same_instance(arg);
                    args.push(value);
                }
                if changed {
                    Term::from_struct(node.with_args(args))
                } else {
                    term.clone()
                }
            }
        }
    }

    fn free_var(&mut self, term: &Term, slot: u32, frame: Frame) -> Term {
        if frame == 0 {
            return term.clone();
        }
        self.fresh
            .entry(slot)
            .or_insert_with(|| Term::slotted_var(symbol(&format!("_G{}", slot)), slot))
            .clone()
    }
}
