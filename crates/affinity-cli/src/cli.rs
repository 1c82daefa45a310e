//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level arguments for the `affinity` binary.
#[derive(Parser, Debug)]
#[command(name = "affinity", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "AFFINITY_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Commands understood by `affinity`.
///
/// Principals are written as `scheme:id`.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Grant a role to a principal on a resource.
    Grant {
        /// Principal receiving the role.
        principal: String,
        /// Role name from the policy.
        role: String,
        /// Resource kind.
        kind: String,
        /// Resource URI.
        uri: String,
    },

    /// Revoke whatever role a principal holds on a resource.
    Revoke {
        /// Principal losing the role.
        principal: String,
        /// Resource kind.
        kind: String,
        /// Resource URI.
        uri: String,
    },

    /// Check a permission. Exits 0 when allowed, 1 when denied.
    Check {
        /// Principal to check.
        principal: String,
        /// Permission name.
        permission: String,
        /// Resource kind.
        kind: String,
        /// Resource URI.
        uri: String,
    },

    /// Show the effective role and permissions on a resource.
    Roles {
        /// Principal to inspect.
        principal: String,
        /// Resource kind.
        kind: String,
        /// Resource URI.
        uri: String,
    },

    /// List every grant a principal holds.
    Grants {
        /// Principal to inspect.
        principal: String,
    },

    /// Print version information.
    Version,

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Print the effective configuration as TOML.
    Show,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "engine.max_depth").
        key: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_no_command() {
        let args = CliArgs::parse_from(["affinity"]);
        assert!(args.command.is_none());
        assert!(!args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_args_global_flags() {
        let args = CliArgs::parse_from(["affinity", "-v", "--config", "/tmp/a.toml", "version"]);
        assert!(args.verbose);
        assert_eq!(args.config.as_deref(), Some("/tmp/a.toml"));
        assert!(matches!(args.command, Some(Command::Version)));
    }

    #[test]
    fn test_cli_args_grant() {
        let args = CliArgs::parse_from([
            "affinity",
            "grant",
            "test:scruffy",
            "janitor",
            "facilities",
            "facilities:bucket",
        ]);
        match args.command {
            Some(Command::Grant {
                principal,
                role,
                kind,
                uri,
            }) => {
                assert_eq!(principal, "test:scruffy");
                assert_eq!(role, "janitor");
                assert_eq!(kind, "facilities");
                assert_eq!(uri, "facilities:bucket");
            }
            other => panic!("expected grant, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_args_check() {
        let args = CliArgs::parse_from([
            "affinity",
            "check",
            "test:leela",
            "control-ship",
            "spacecraft",
            "spacecraft:ship",
        ]);
        assert!(matches!(
            args.command,
            Some(Command::Check { ref permission, .. }) if permission == "control-ship"
        ));
    }

    #[test]
    fn test_cli_args_revoke_requires_uri() {
        let result =
            CliArgs::try_parse_from(["affinity", "revoke", "test:leela", "spacecraft"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_args_config_init() {
        let args = CliArgs::parse_from(["affinity", "config", "init", "--file", "x.toml", "--force"]);
        match args.command {
            Some(Command::Config(ConfigCommand {
                command: ConfigAction::Init { file, force },
            })) => {
                assert_eq!(file.as_deref(), Some("x.toml"));
                assert!(force);
            }
            other => panic!("expected config init, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_args_config_get() {
        let args = CliArgs::parse_from(["affinity", "config", "get", "engine.max_depth"]);
        assert!(matches!(
            args.command,
            Some(Command::Config(ConfigCommand {
                command: ConfigAction::Get { ref key },
            })) if key == "engine.max_depth"
        ));
    }
}
