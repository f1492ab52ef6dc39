//! Term predicates
//!
//! Unification and identity, type checks, arithmetic entry points, term
//! construction and inspection, and `findall/3`.

use crate::arith::{compare, eval, CompOp};
use crate::BuiltinError;
use prolog_core::Bindings;
use prolog_solver::{Code, PrimitiveCall};
use prolog_term::{Term, Value};

type Outcome = Result<Code, BuiltinError>;

fn proceed_if(call: &mut PrimitiveCall<'_, '_>, condition: bool) -> Outcome {
    Ok(if condition { call.proceed() } else { Code::CONTINUE })
}

/// Integer value of a reified argument
fn integer_arg(term: Term) -> Result<i64, BuiltinError> {
    match term {
        Term::Atomic(Value::Integer(n)) => Ok(n),
        Term::Var(_) => Err(BuiltinError::Unbound),
        other => Err(BuiltinError::Type {
            expected: "integer",
            found: other.to_string(),
        }),
    }
}

/// `n` distinct unassigned variables
fn fresh_vars(n: usize) -> Vec<Term> {
    (0..n).map(|i| Term::var(&format!("_V{}", i))).collect()
}

/// `X = Y`
pub fn unify(call: &mut PrimitiveCall<'_, '_>) -> Outcome {
    let next = call.unify_args(0, 1)?;
    Ok(call.succeed_with(next))
}

/// `X \= Y`
pub fn not_unifiable(call: &mut PrimitiveCall<'_, '_>) -> Outcome {
    let unifiable = call.unify_args(0, 1)?.is_some();
    proceed_if(call, !unifiable)
}

/// `X == Y`
pub fn identical(call: &mut PrimitiveCall<'_, '_>) -> Outcome {
    let same = call.identical(0, 1)?;
    proceed_if(call, same)
}

/// `X \== Y`
pub fn not_identical(call: &mut PrimitiveCall<'_, '_>) -> Outcome {
    let same = call.identical(0, 1)?;
    proceed_if(call, !same)
}

/// `X is Expr`
pub fn is(call: &mut PrimitiveCall<'_, '_>) -> Outcome {
    let value = eval(&call.value(1)?)?;
    let next = call.unify_value(0, &value.to_term())?;
    Ok(call.succeed_with(next))
}

pub fn arith_compare(call: &mut PrimitiveCall<'_, '_>, op: CompOp) -> Outcome {
    let holds = compare(op, &call.value(0)?, &call.value(1)?)?;
    proceed_if(call, holds)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCheck {
    Var,
    NonVar,
    Atom,
    Number,
    Integer,
    Float,
    Atomic,
    Compound,
    Callable,
}

impl TypeCheck {
    pub fn accepts(self, term: &Term) -> bool {
        match self {
            TypeCheck::Var => term.is_var(),
            TypeCheck::NonVar => !term.is_var(),
            TypeCheck::Atom => term.is_atom(),
            TypeCheck::Number => term.is_number(),
            TypeCheck::Integer => matches!(term, Term::Atomic(Value::Integer(_))),
            TypeCheck::Float => matches!(term, Term::Atomic(Value::Float(_))),
            TypeCheck::Atomic => term.is_atomic(),
            TypeCheck::Compound => term.is_compound(),
            TypeCheck::Callable => term.is_callable(),
        }
    }
}

pub fn type_check(call: &mut PrimitiveCall<'_, '_>, check: TypeCheck) -> Outcome {
    let accepted = {
        let (term, _) = call.deref(0)?;
        check.accepts(term)
    };
    proceed_if(call, accepted)
}

/// `is_list(L)`: proper lists only
pub fn is_list(call: &mut PrimitiveCall<'_, '_>) -> Outcome {
    let proper = call.value(0)?.is_list();
    proceed_if(call, proper)
}

/// `length(L, N)`. A proper list is measured; otherwise `N` must be a
/// non-negative integer and `L` is unified with a list of that many fresh
/// variables.
pub fn length(call: &mut PrimitiveCall<'_, '_>) -> Outcome {
    let list = call.value(0)?;
    if list.is_list() {
        let len = list.list_len()?;
        let next = call.unify_value(1, &Term::integer(len as i64))?;
        return Ok(call.succeed_with(next));
    }

    let n = integer_arg(call.value(1)?)?;
    let Ok(n) = usize::try_from(n) else {
        return Ok(Code::CONTINUE);
    };
    let next = call.unify_fresh(0, &Term::list(fresh_vars(n)))?;
    Ok(call.succeed_with(next))
}

/// `functor(T, Name, Arity)`: decomposes a bound `T`, or builds a term of
/// fresh variables when `T` is unbound
pub fn functor(call: &mut PrimitiveCall<'_, '_>) -> Outcome {
    let term = call.value(0)?;
    let (name, arity) = match &term {
        Term::Var(_) => return build_functor(call),
        Term::Atomic(_) => (term.clone(), 0),
        Term::Struct(node) => (Term::Atomic(Value::Atom(node.functor())), node.arity()),
    };
    let arity_arg = call.arg(2)?.clone();
    let frame = call.frame();
    let next = call
        .unify_value(1, &name)?
        .and_then(|next| next.unify_in(&arity_arg, frame, &Term::integer(arity as i64), 0));
    Ok(call.succeed_with(next))
}

fn build_functor(call: &mut PrimitiveCall<'_, '_>) -> Outcome {
    let name = call.value(1)?;
    let arity = integer_arg(call.value(2)?)?;
    let built = match (&name, usize::try_from(arity)) {
        (_, Ok(0)) if name.is_atomic() => name.clone(),
        (Term::Atomic(Value::Atom(functor)), Ok(arity)) => Term::compound_sym(*functor, fresh_vars(arity))?,
        (Term::Var(_), _) => return Err(BuiltinError::Unbound),
        _ => {
            return Err(BuiltinError::Type {
                expected: "atom with non-negative arity",
                found: format!("{}/{}", name, arity),
            })
        }
    };
    let next = call.unify_fresh(0, &built)?;
    Ok(call.succeed_with(next))
}

/// `arg(N, T, A)`: `A` unifies with the `N`th argument of compound `T`,
/// counting from 1
pub fn arg(call: &mut PrimitiveCall<'_, '_>) -> Outcome {
    let n = integer_arg(call.value(0)?)?;
    let next = {
        let (term, term_frame) = call.deref(1)?;
        let node = match term {
            Term::Struct(node) => node,
            Term::Var(_) => return Err(BuiltinError::Unbound),
            other => {
                return Err(BuiltinError::Type {
                    expected: "compound",
                    found: other.to_string(),
                })
            }
        };
        let index = match usize::try_from(n) {
            Ok(n) if (1..=node.arity()).contains(&n) => n - 1,
            _ => return Ok(Code::CONTINUE),
        };
        call.bindings()
            .unify_in(call.arg(2)?, call.frame(), &node.args()[index], term_frame)
    };
    Ok(call.succeed_with(next))
}

/// `findall(Template, Goal, List)`
pub fn findall(call: &mut PrimitiveCall<'_, '_>) -> Outcome {
    let template = call.arg(0)?.clone();
    let frame = call.frame();
    let (goal, goal_frame) = {
        let (goal, goal_frame) = call.deref(1)?;
        (goal.clone(), goal_frame)
    };

    let mut results = Vec::new();
    let code = call.solve_isolated(&goal, goal_frame, &mut |bindings: &Bindings| {
        results.push(bindings.reify_in(&template, frame).fresh_copy());
        Code::CONTINUE
    });
    if code.is_abort() {
        return Ok(Code::ABORT);
    }

    let next = call.unify_fresh(2, &Term::list(results))?;
    Ok(call.succeed_with(next))
}
