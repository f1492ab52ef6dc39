//! Core inference data structures
//!
//! This crate turns freshly built terms into their search-ready form and
//! provides the binding environment that proof search threads through every
//! unification attempt.
//!
//! # Key Components
//!
//! - **normalize**: factorization, variable slot assignment and primitive binding
//! - **Bindings**: immutable unify context with `unify` and `reify`
//! - **Clause**: a normalized head plus optional body
//! - **ClauseProvider / DataFactProvider**: candidate sources for the solver
//! - **ClauseDatabase / FactDatabase**: in-memory providers
//!
//! # Example
//!
//! ```ignore
//! let goal = normalize(&parse("parent(X, mary)"), &NoPrimitives);
//! let bindings = Bindings::for_goal(&goal);
//! if let Some(next) = bindings.unify(&goal, &fact) {
//!     println!("{}", next.reify(&goal));
//! }
//! ```

pub mod clause;
pub mod context;
pub mod database;
pub mod normalize;
pub mod provider;

pub use clause::{Clause, ClauseError};
pub use context::{Bindings, Frame};
pub use database::{ClauseDatabase, FactDatabase, InsertError};
pub use normalize::{factorize, normalize, Arity, NoPrimitives, PrimitiveTable};
pub use provider::{ClauseProvider, DataFactProvider};
