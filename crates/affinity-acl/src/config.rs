//! Engine tuning.

use serde::{Deserialize, Serialize};

/// Default bound on the length of an ancestor chain.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Settings shared by the access and admin engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of resources, the queried one included, in an
    /// ancestor chain. Longer chains (or cycles) are reported as
    /// [`Error::DepthExceeded`](affinity_core::Error::DepthExceeded).
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_default() {
        assert_eq!(EngineConfig::default().max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_engine_config_missing_fields_default() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());

        let config: EngineConfig = serde_json::from_str(r#"{"max_depth": 4}"#).unwrap();
        assert_eq!(config.max_depth, 4);
    }
}
