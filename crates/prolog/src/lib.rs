//! Embeddable resolution engine
//!
//! This crate ties the term model, the unify context, the solver and the
//! standard primitives together behind a single [`Engine`].
//!
//! # Key Components
//!
//! - **Engine**: owns the primitive registry, databases and providers
//! - **Query**: a restartable, lazy sequence of solutions for one goal
//! - **Solution**: the query's named variables reified for one answer
//! - **EngineConfig**: JSON-loadable settings
//!
//! # Example
//!
//! ```ignore
//! use prolog::{Engine, Term};
//!
//! let mut engine = Engine::new();
//! engine.add_data_fact(Term::compound("likes", vec![Term::atom("ann"), Term::atom("tea")])?)?;
//!
//! let query = engine.query(Term::compound("likes", vec![Term::var("Who"), Term::atom("tea")])?)?;
//! for solution in query.all() {
//!     println!("{}", solution);
//! }
//! ```

mod config;
mod engine;
mod error;
mod query;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::EngineError;
pub use query::{Query, Solution};

pub use prolog_core::{
    Arity, Bindings, Clause, ClauseError, ClauseProvider, DataFactProvider, Frame, InsertError,
};
pub use prolog_solver::{Code, PrimitiveCall, PrimitiveRegistry, SolverConfig, UnknownPredicate};
pub use prolog_term::{Signature, Term, TermError, Value};
