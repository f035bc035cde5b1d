//! Command implementations for the Kiln CLI.
//!
//! - [`build`] - build every target once, or watch them
//! - [`print_schema`] - print the configuration file's JSON schema

pub mod build;

pub use build::execute as build_execute;

use crate::config::KilnConfig;
use crate::error::Result;

/// Print the JSON schema of `kiln.config.json` to stdout.
pub fn print_schema() -> Result<()> {
    let schema = KilnConfig::json_schema()?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
