//! Configuration for the Affinity CLI.
//!
//! Provides the [`AffinityConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `AFFINITY_CONFIG` environment variable
//! 3. XDG default: `~/.config/affinity/config.toml`
//! 4. Built-in defaults

use affinity_acl::EngineConfig;
use affinity_core::{Error, Result};
use confyg::{Confygery, env};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "affinity";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AffinityConfig {
    /// Path to the TOML policy file.
    pub policy_path: Option<String>,

    /// Path to the JSON grant store.
    pub store_path: Option<String>,

    /// Engine settings.
    pub engine: EngineConfig,
}

// ============================================================================
// Config loading
// ============================================================================

impl AffinityConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("AFFINITY");
        env_opts.add_section("engine");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("AFFINITY_CONFIG") {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// The policy file: configured, else `policy.toml` next to the config.
    pub fn policy_path(&self) -> Result<PathBuf> {
        match &self.policy_path {
            Some(p) => Ok(PathBuf::from(p)),
            None => dirs::config_dir()
                .map(|d| d.join(APP_DIR).join("policy.toml"))
                .ok_or_else(|| Error::config("Could not determine policy path")),
        }
    }

    /// The grant store: configured, else `grants.json` in the data dir.
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(p) => Ok(PathBuf::from(p)),
            None => dirs::data_dir()
                .map(|d| d.join(APP_DIR).join("grants.json"))
                .ok_or_else(|| Error::config("Could not determine grant store path")),
        }
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
