//! Resolution engine
//!
//! Solves normalized goals against clause and fact providers, dispatching
//! native primitives from a [`PrimitiveRegistry`]. Control flow between
//! goals (backtracking, cut, abort) is carried by integer continuation
//! [`Code`]s rather than unwinding.
//!
//! # Example
//!
//! ```ignore
//! let solver = Solver::new(&registry).with_clauses(&db);
//! let bindings = Bindings::for_goal(&goal);
//! solver.solve(&goal, &bindings, &mut |b: &Bindings| {
//!     println!("{}", b.reify(&goal));
//!     Code::CONTINUE
//! });
//! ```

pub mod code;
pub mod config;
pub mod primitive;
pub mod solver;

pub use code::Code;
pub use config::{SolverConfig, UnknownPredicate};
pub use primitive::{Primitive, PrimitiveCall, PrimitiveRegistry};
pub use solver::{Listener, Provider, Scope, Solver};
