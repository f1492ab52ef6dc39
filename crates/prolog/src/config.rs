//! Engine configuration
//!
//! ```json
//! {
//!   "standard_builtins": true,
//!   "solver": { "unknown_predicate": "warn" }
//! }
//! ```
//!
//! Every field is optional and falls back to its default.

use crate::EngineError;
use prolog_solver::SolverConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub solver: SolverConfig,
    /// Register the standard primitive library on construction
    pub standard_builtins: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            solver: SolverConfig::default(),
            standard_builtins: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prolog_solver::UnknownPredicate;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.standard_builtins);
    }

    #[test]
    fn test_nested_solver_config() {
        let config = EngineConfig::from_json(
            r#"{"standard_builtins": false, "solver": {"unknown_predicate": "warn"}}"#,
        )
        .unwrap();
        assert!(!config.standard_builtins);
        assert_eq!(config.solver.unknown_predicate, UnknownPredicate::Warn);
        assert_eq!(EngineConfig::from_json(&config.to_json().unwrap()).unwrap(), config);
    }

    #[test]
    fn test_invalid_config() {
        let err = EngineConfig::from_json(r#"{"solver": {"unknown_predicate": "explode"}}"#)
            .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
