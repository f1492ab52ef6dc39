//! Term normalization
//!
//! A freshly built term is turned into canonical, search-ready form in three
//! steps:
//!
//! 1. **Factorization**: structurally equal compound subterms are collapsed
//!    onto the first instance emitted in post-order.
//! 2. **Indexing**: every first-seen named variable gets the next slot number
//!    in left-to-right, depth-first order. The anonymous variable keeps its
//!    "never bind" sentinel.
//! 3. **Primitive binding**: each compound's functor/arity (then the
//!    variadic wildcard) is looked up in a primitive table and the match is
//!    attached for fast dispatch.
//!
//! Normalization is pure and idempotent: running it on an already
//! normalized term returns the same instances.

use prolog_term::{PrimitiveId, Struct, Symbol, Term, Var};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Arity a primitive is registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Exact(usize),
    /// Matches any number of arguments
    Variadic,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Variadic => write!(f, "*"),
        }
    }
}

/// Source of native primitive handles consulted during normalization
pub trait PrimitiveTable {
    fn lookup(&self, name: Symbol, arity: Arity) -> Option<PrimitiveId>;
}

/// Table without any primitives
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrimitives;

impl PrimitiveTable for NoPrimitives {
    fn lookup(&self, _name: Symbol, _arity: Arity) -> Option<PrimitiveId> {
        None
    }
}

/// Produce the canonical form of `term`
pub fn normalize(term: &Term, table: &dyn PrimitiveTable) -> Term {
    let factored = factorize(term);
    Indexer::new(table).index(&factored)
}

/// Share structurally equal compound subterms.
///
/// Returns the original instance when no replacement happened anywhere.
pub fn factorize(term: &Term) -> Term {
    let mut emitted = HashSet::new();
    factor(term, &mut emitted, true)
}

fn factor(term: &Term, emitted: &mut HashSet<Term>, root: bool) -> Term {
    let Term::Struct(node) = term else {
        return term.clone();
    };

    let mut changed = false;
    let args: Vec<Term> = node
        .args()
        .iter()
        .map(|arg| {
            let factored = factor(arg, emitted, false);
            changed |= !factored.same_instance(arg);
            factored
        })
        .collect();

    let rebuilt = if changed {
        Term::from_struct(node.with_args(args))
    } else {
        term.clone()
    };

    // the root's own entry is implicit
    if root {
        return rebuilt;
    }
    if let Some(existing) = emitted.get(&rebuilt) {
        return existing.clone();
    }
    emitted.insert(rebuilt.clone());
    rebuilt
}

struct Indexer<'t> {
    table: &'t dyn PrimitiveTable,
    vars: HashMap<*const Var, Term>,
    nodes: HashMap<*const Struct, Term>,
    next_slot: u32,
}

impl<'t> Indexer<'t> {
    fn new(table: &'t dyn PrimitiveTable) -> Self {
        Indexer {
            table,
            vars: HashMap::new(),
            nodes: HashMap::new(),
            next_slot: 0,
        }
    }

    fn index(&mut self, term: &Term) -> Term {
        match term {
            Term::Atomic(_) => term.clone(),
            Term::Var(var) if var.is_anonymous() => term.clone(),
            Term::Var(var) => {
                let key = Arc::as_ptr(var);
                if let Some(indexed) = self.vars.get(&key) {
                    return indexed.clone();
                }
                let slot = self.next_slot;
                self.next_slot += 1;
                let indexed = if var.index() == Some(slot) {
                    term.clone()
                } else {
                    Term::slotted_var(var.name(), slot)
                };
                self.vars.insert(key, indexed.clone());
                indexed
            }
            Term::Struct(node) => {
                let key = Arc::as_ptr(node);
                if let Some(indexed) = self.nodes.get(&key) {
                    return indexed.clone();
                }

                let mut changed = false;
                let mut args = Vec::with_capacity(node.arity());
                for arg in node.args() {
                    let indexed = self.index(arg);
                    changed |= !indexed.same_instance(arg);
                    args.push(indexed);
                }

                let primitive = self.primitive_for(node);
                let indexed = if changed || primitive != node.primitive() {
                    Term::from_struct(node.rebuild(args, primitive))
                } else {
                    term.clone()
                };
                self.nodes.insert(key, indexed.clone());
                indexed
            }
        }
    }

    fn primitive_for(&self, node: &Struct) -> Option<PrimitiveId> {
        self.table
            .lookup(node.functor(), Arity::Exact(node.arity()))
            .or_else(|| self.table.lookup(node.functor(), Arity::Variadic))
    }
}
