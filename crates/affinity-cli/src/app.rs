//! The `affinity` application: logging setup and command dispatch.

use crate::cli::{CliArgs, Command};
use crate::config::AffinityConfig;
use crate::config_handlers;
use crate::handlers::{Engines, Outcome};
use affinity_core::Result;
use tracing_subscriber::EnvFilter;

// ============================================================================
// AffinityCli
// ============================================================================

/// The CLI application over a loaded configuration.
pub struct AffinityCli {
    config: AffinityConfig,
    version: String,
}

impl AffinityCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let config = AffinityConfig::load(args.config.as_deref())?;
        Ok(Self::new(config))
    }

    /// Create an application over `config`.
    pub fn new(config: AffinityConfig) -> Self {
        Self {
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &AffinityConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<Outcome> {
        self.init_logging(args.verbose, args.quiet);

        match args.command {
            Some(Command::Version) | None => {
                println!("affinity {}", self.version);
                Ok(Outcome::Done)
            }
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)?;
                Ok(Outcome::Done)
            }
            Some(Command::Grant {
                principal,
                role,
                kind,
                uri,
            }) => self.engines()?.grant(&principal, &role, &kind, &uri).await,
            Some(Command::Revoke {
                principal,
                kind,
                uri,
            }) => self.engines()?.revoke(&principal, &kind, &uri).await,
            Some(Command::Check {
                principal,
                permission,
                kind,
                uri,
            }) => {
                self.engines()?
                    .check(&principal, &permission, &kind, &uri)
                    .await
            }
            Some(Command::Roles {
                principal,
                kind,
                uri,
            }) => self.engines()?.roles(&principal, &kind, &uri).await,
            Some(Command::Grants { principal }) => self.engines()?.grants(&principal).await,
        }
    }

    fn engines(&self) -> Result<Engines> {
        Engines::open(&self.config)
    }
}

// ============================================================================
// Tests
// ============================================================================
