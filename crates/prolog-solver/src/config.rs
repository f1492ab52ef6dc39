use serde::{Deserialize, Serialize};

/// What to do when a goal finds neither a primitive nor any candidate clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPredicate {
    /// Fail silently (closed world)
    #[default]
    Fail,
    /// Fail and emit a `warn` event
    Warn,
}

/// Per-solver settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub unknown_predicate: UnknownPredicate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: SolverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SolverConfig::default());
        assert_eq!(config.unknown_predicate, UnknownPredicate::Fail);
    }

    #[test]
    fn test_config_from_json() {
        let config: SolverConfig =
            serde_json::from_str(r#"{"unknown_predicate": "warn"}"#).unwrap();
        assert_eq!(config.unknown_predicate, UnknownPredicate::Warn);
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(text, r#"{"unknown_predicate":"warn"}"#);
    }
}
