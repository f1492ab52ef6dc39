//! Core term definitions
//!
//! A term is one of three variants:
//!
//! - **Atomic**: an immutable scalar (`foo`, `42`, `3.5`, `"text"`)
//! - **Struct**: a functor applied to one or more arguments (`f(a, X)`)
//! - **Var**: a logic variable (`X`, `_`)
//!
//! Compound terms and variables are reference counted so that a term graph
//! can be shared between clause stores, goals and solutions without copying.

use crate::TermError;
use internment::Intern;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

/// Interned string for atom names, functors and variable names.
///
/// The intern table is process-scoped: it grows for the life of the process
/// and never evicts, so two equal names always map to the same handle and
/// compare by identity.
pub type Symbol = Intern<String>;

/// Intern a name
pub fn symbol(name: &str) -> Symbol {
    Intern::new(name.to_string())
}

static ANONYMOUS: LazyLock<Arc<Var>> = LazyLock::new(|| {
    Arc::new(Var {
        name: symbol("_"),
        slot: Slot::Anonymous,
    })
});

/// Atomic constant values
#[derive(Debug, Clone)]
pub enum Value {
    Atom(Symbol),
    Integer(i64),
    Float(f64),
    String(Symbol),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Atom(a), Value::Atom(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_bits(*a) == float_bits(*b),
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

/// Floats are compared by bit pattern so that equality stays reflexive:
/// a NaN equals itself, and `0.0` and `-0.0` are folded together.
fn float_bits(f: f64) -> u64 {
    if f == 0.0 {
        0
    } else {
        f.to_bits()
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Atom(a) => {
                0u8.hash(state);
                a.hash(state);
            }
            Value::Integer(i) => {
                1u8.hash(state);
                i.hash(state);
            }
            Value::Float(f) => {
                2u8.hash(state);
                float_bits(*f).hash(state);
            }
            Value::String(s) => {
                3u8.hash(state);
                s.hash(state);
            }
        }
    }
}

/// Handle of a native primitive attached to a compound term during
/// normalization. The handle indexes the registry the term was normalized
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveId(u32);

impl PrimitiveId {
    pub const fn new(raw: u32) -> Self {
        PrimitiveId(raw)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Predicate signature: name and arity (`append/3`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    pub name: Symbol,
    pub arity: usize,
}

impl Signature {
    pub fn new(name: impl AsRef<str>, arity: usize) -> Self {
        Signature {
            name: symbol(name.as_ref()),
            arity,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// Binding slot of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Not normalized yet
    Unassigned,
    /// Slot number within the owning clause or goal
    Index(u32),
    /// The anonymous variable, never bound
    Anonymous,
}

/// A logic variable
#[derive(Debug)]
pub struct Var {
    name: Symbol,
    slot: Slot,
}

impl Var {
    pub fn name(&self) -> Symbol {
        self.name
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Slot number, if one has been assigned
    pub fn index(&self) -> Option<u32> {
        match self.slot {
            Slot::Index(index) => Some(index),
            Slot::Unassigned | Slot::Anonymous => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.slot == Slot::Anonymous
    }
}

/// A compound term: functor plus at least one argument
#[derive(Debug)]
pub struct Struct {
    functor: Symbol,
    args: Box<[Term]>,
    /// One past the highest variable slot found below this node; zero when
    /// no slotted variable occurs in the subtree.
    var_bound: u32,
    primitive: Option<PrimitiveId>,
}

impl Struct {
    pub(crate) fn from_parts(functor: Symbol, args: Vec<Term>, primitive: Option<PrimitiveId>) -> Self {
        let var_bound = args.iter().map(Term::var_bound).max().unwrap_or(0);
        Struct {
            functor,
            args: args.into_boxed_slice(),
            var_bound,
            primitive,
        }
    }

    pub fn functor(&self) -> Symbol {
        self.functor
    }

    pub fn name(&self) -> &str {
        self.functor.as_str()
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn args(&self) -> &[Term] {
        &self.args
    }

    /// Argument at `index`, failing fast when out of range
    pub fn arg(&self, index: usize) -> Result<&Term, TermError> {
        self.args.get(index).ok_or_else(|| TermError::ArgumentOutOfRange {
            functor: self.functor.to_string(),
            arity: self.args.len(),
            index,
        })
    }

    pub fn signature(&self) -> Signature {
        Signature {
            name: self.functor,
            arity: self.args.len(),
        }
    }

    pub fn var_bound(&self) -> u32 {
        self.var_bound
    }

    /// Whether any slotted variable occurs below this node
    pub fn has_vars(&self) -> bool {
        self.var_bound > 0
    }

    pub fn primitive(&self) -> Option<PrimitiveId> {
        self.primitive
    }

    /// Rebuild with replacement arguments of the same arity, keeping the
    /// functor and the attached primitive.
    pub fn with_args(&self, args: Vec<Term>) -> Struct {
        debug_assert_eq!(args.len(), self.args.len());
        Struct::from_parts(self.functor, args, self.primitive)
    }

    /// Copy of this node with a different primitive attachment
    pub fn with_primitive(&self, primitive: Option<PrimitiveId>) -> Struct {
        Struct {
            functor: self.functor,
            args: self.args.clone(),
            var_bound: self.var_bound,
            primitive,
        }
    }

    /// Rebuild with replacement arguments and primitive attachment
    pub fn rebuild(&self, args: Vec<Term>, primitive: Option<PrimitiveId>) -> Struct {
        debug_assert_eq!(args.len(), self.args.len());
        Struct::from_parts(self.functor, args, primitive)
    }

    pub fn is_list_cell(&self) -> bool {
        self.args.len() == 2 && self.functor.as_str() == crate::LIST_CONS
    }
}

/// A logic term
#[derive(Debug, Clone)]
pub enum Term {
    Atomic(Value),
    Struct(Arc<Struct>),
    Var(Arc<Var>),
}

impl Term {
    pub fn atom(name: &str) -> Term {
        Term::Atomic(Value::Atom(symbol(name)))
    }

    pub fn integer(value: i64) -> Term {
        Term::Atomic(Value::Integer(value))
    }

    pub fn float(value: f64) -> Term {
        Term::Atomic(Value::Float(value))
    }

    pub fn string(text: &str) -> Term {
        Term::Atomic(Value::String(symbol(text)))
    }

    /// A fresh, unassigned variable. The name `_` yields the anonymous
    /// singleton.
    pub fn var(name: &str) -> Term {
        if name == "_" {
            return Term::anonymous();
        }
        Term::Var(Arc::new(Var {
            name: symbol(name),
            slot: Slot::Unassigned,
        }))
    }

    /// A variable carrying a slot number
    pub fn slotted_var(name: Symbol, index: u32) -> Term {
        Term::Var(Arc::new(Var {
            name,
            slot: Slot::Index(index),
        }))
    }

    pub fn anonymous() -> Term {
        Term::Var(Arc::clone(&ANONYMOUS))
    }

    /// Build a compound term.
    ///
    /// Zero arguments yield the atom of the same name, so the empty functor
    /// is only legal at arity 0.
    pub fn compound(functor: &str, args: Vec<Term>) -> Result<Term, TermError> {
        Term::compound_sym(symbol(functor), args)
    }

    pub fn compound_sym(functor: Symbol, args: Vec<Term>) -> Result<Term, TermError> {
        if args.is_empty() {
            return Ok(Term::Atomic(Value::Atom(functor)));
        }
        if functor.is_empty() {
            return Err(TermError::EmptyFunctor { arity: args.len() });
        }
        Ok(Term::from_struct(Struct::from_parts(functor, args, None)))
    }

    pub fn from_struct(node: Struct) -> Term {
        Term::Struct(Arc::new(node))
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self, Term::Atomic(_))
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, Term::Struct(_))
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Term::Atomic(Value::Atom(_)))
    }

    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Term::Atomic(Value::Integer(_)) | Term::Atomic(Value::Float(_))
        )
    }

    /// Atoms and compound terms can be used as goals
    pub fn is_callable(&self) -> bool {
        self.is_atom() || self.is_compound()
    }

    pub fn as_atom(&self) -> Option<Symbol> {
        match self {
            Term::Atomic(Value::Atom(name)) => Some(*name),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Term::Atomic(Value::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            Term::Struct(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Term::Var(var) => Some(var),
            _ => None,
        }
    }

    pub fn signature(&self) -> Option<Signature> {
        match self {
            Term::Atomic(Value::Atom(name)) => Some(Signature {
                name: *name,
                arity: 0,
            }),
            Term::Struct(node) => Some(node.signature()),
            _ => None,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Term::Struct(node) => node.arity(),
            _ => 0,
        }
    }

    pub fn args(&self) -> &[Term] {
        match self {
            Term::Struct(node) => node.args(),
            _ => &[],
        }
    }

    /// One past the highest variable slot occurring in this term
    pub fn var_bound(&self) -> u32 {
        match self {
            Term::Atomic(_) => 0,
            Term::Var(var) => var.index().map_or(0, |index| index + 1),
            Term::Struct(node) => node.var_bound,
        }
    }

    /// Check if this term contains no variables at all
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Atomic(_) => true,
            Term::Var(_) => false,
            Term::Struct(node) => node.args.iter().all(Term::is_ground),
        }
    }

    /// Identity check: the same compound or variable instance, or equal
    /// atomic values.
    pub fn same_instance(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Struct(a), Term::Struct(b)) => Arc::ptr_eq(a, b),
            (Term::Var(a), Term::Var(b)) => Arc::ptr_eq(a, b),
            (Term::Atomic(a), Term::Atomic(b)) => a == b,
            _ => false,
        }
    }

    /// Copy with every named variable replaced by a fresh, unassigned one.
    /// All occurrences of one variable map to the same copy; the anonymous
    /// variable stays anonymous.
    pub fn fresh_copy(&self) -> Term {
        fn copy(term: &Term, renamed: &mut HashMap<*const Var, Term>) -> Term {
            match term {
                Term::Atomic(_) => term.clone(),
                Term::Var(var) if var.is_anonymous() => term.clone(),
                Term::Var(var) => renamed
                    .entry(Arc::as_ptr(var))
                    .or_insert_with(|| Term::var(var.name.as_str()))
                    .clone(),
                Term::Struct(node) => {
                    let args = node.args.iter().map(|arg| copy(arg, renamed)).collect();
                    Term::from_struct(node.with_args(args))
                }
            }
        }
        copy(self, &mut HashMap::new())
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Atomic(a), Term::Atomic(b)) => a == b,
            (Term::Var(a), Term::Var(b)) => Arc::ptr_eq(a, b),
            (Term::Struct(a), Term::Struct(b)) => {
                Arc::ptr_eq(a, b) || (a.functor == b.functor && a.args == b.args)
            }
            _ => false,
        }
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Term::Atomic(value) => {
                0u8.hash(state);
                value.hash(state);
            }
            Term::Struct(node) => {
                1u8.hash(state);
                node.functor.hash(state);
                node.args.hash(state);
            }
            Term::Var(var) => {
                2u8.hash(state);
                std::ptr::hash(Arc::as_ptr(var), state);
            }
        }
    }
}

impl From<Value> for Term {
    fn from(value: Value) -> Self {
        Term::Atomic(value)
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::integer(value)
    }
}

impl From<f64> for Term {
    fn from(value: f64) -> Self {
        Term::float(value)
    }
}
