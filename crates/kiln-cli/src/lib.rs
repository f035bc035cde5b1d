//! Kiln CLI - build every bundle of a desktop app in one go.
//!
//! This crate wraps [`kiln_bundler`] in a command-line tool: it loads
//! `kiln.config.json`, composes the declared targets, runs them through
//! esbuild and reports the outcome.
//!
//! # Architecture
//!
//! - [`cli`] - argument parsing
//! - [`config`] - layered configuration loading (defaults, file, environment)
//! - [`commands`] - the build/watch command and schema printing
//! - [`error`] - CLI error types and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - terminal status lines and the build summary
//!
//! # Example
//!
//! ```rust,no_run
//! use kiln_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, ConfigError, Result, ResultExt};
