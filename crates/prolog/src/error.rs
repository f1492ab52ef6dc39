use prolog_core::{ClauseError, InsertError};
use prolog_term::TermError;
use thiserror::Error;

/// Errors surfaced by the engine facade
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Term(#[from] TermError),
    #[error(transparent)]
    Clause(#[from] ClauseError),
    #[error(transparent)]
    Insert(#[from] InsertError),
    /// Queries must be atoms or compound terms
    #[error("goal {goal} is not callable")]
    NotCallable { goal: String },
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
