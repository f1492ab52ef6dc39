//! Standard primitive library
//!
//! Native predicates for unification, term inspection, arithmetic and
//! all-solutions collection. [`register_standard`] installs all of them into
//! a [`PrimitiveRegistry`].
//!
//! A primitive that hits an evaluation error (an unbound operand, a
//! non-numeric value, division by zero) fails and logs the error at `debug`
//! level instead of aborting the search.

pub mod arith;
pub mod predicates;

use prolog_core::Arity;
use prolog_solver::{Code, PrimitiveCall, PrimitiveRegistry};
use prolog_term::TermError;
use thiserror::Error;

pub use arith::{compare, eval, CompOp, Numeric};

/// Evaluation errors raised inside primitives
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuiltinError {
    #[error("arguments are not sufficiently instantiated")]
    Unbound,
    #[error("expected {expected}, found {found}")]
    Type { expected: &'static str, found: String },
    #[error("{name} is not an arithmetic function")]
    UnknownEvaluable { name: String },
    #[error("division by zero")]
    ZeroDivisor,
    #[error("integer overflow")]
    Overflow,
    #[error(transparent)]
    Term(#[from] TermError),
}

/// Register a fallible primitive. Errors make the goal fail.
pub fn install<F>(registry: &mut PrimitiveRegistry, name: &str, arity: usize, builtin: F)
where
    F: Fn(&mut PrimitiveCall<'_, '_>) -> Result<Code, BuiltinError> + Send + Sync + 'static,
{
    registry.register(name, Arity::Exact(arity), move |call: &mut PrimitiveCall<'_, '_>| {
        match builtin(call) {
            Ok(code) => code,
            Err(err) => {
                tracing::debug!(goal = %call.goal(), error = %err, "primitive failed");
                Code::CONTINUE
            }
        }
    });
}

/// Install the standard primitives
pub fn register_standard(registry: &mut PrimitiveRegistry) {
    use predicates::*;

    install(registry, "=", 2, unify);
    install(registry, "\\=", 2, not_unifiable);
    install(registry, "==", 2, identical);
    install(registry, "\\==", 2, not_identical);

    install(registry, "is", 2, is);
    for (name, op) in [
        ("=:=", CompOp::Eq),
        ("=\\=", CompOp::Neq),
        ("<", CompOp::Lt),
        (">", CompOp::Gt),
        ("=<", CompOp::Lte),
        (">=", CompOp::Gte),
    ] {
        install(registry, name, 2, move |call| arith_compare(call, op));
    }

    for (name, check) in [
        ("var", TypeCheck::Var),
        ("nonvar", TypeCheck::NonVar),
        ("atom", TypeCheck::Atom),
        ("number", TypeCheck::Number),
        ("integer", TypeCheck::Integer),
        ("float", TypeCheck::Float),
        ("atomic", TypeCheck::Atomic),
        ("compound", TypeCheck::Compound),
        ("callable", TypeCheck::Callable),
    ] {
        install(registry, name, 1, move |call| type_check(call, check));
    }

    install(registry, "is_list", 1, is_list);
    install(registry, "length", 2, length);
    install(registry, "functor", 3, functor);
    install(registry, "arg", 3, arg);
    install(registry, "findall", 3, findall);

    tracing::debug!(count = registry.len(), "registered standard primitives");
}
