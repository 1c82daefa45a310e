//! Command-line administration of Affinity grants.
//!
//! # Modules
//!
//! - [`cli`]: Argument parsing
//! - [`config`]: `AffinityConfig` loading
//! - [`app`]: Logging setup and dispatch
//! - [`handlers`]: Grant, revoke and query commands
//! - [`config_handlers`]: `affinity config` subcommands

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod handlers;

pub use app::AffinityCli;
pub use cli::{CliArgs, Command, ConfigAction, ConfigCommand};
pub use config::AffinityConfig;
pub use handlers::{Engines, Outcome};
