//! Logging infrastructure for the Kiln CLI.
//!
//! Build progress from the library is reported through `tracing` events that
//! carry the target name as a field; this module installs the subscriber that
//! prints them.
//!
//! # Example
//!
//! ```rust,no_run
//! use kiln_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!(target_name = "renderer", "Built");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "kiln=debug,kiln_bundler=debug,kiln_cli=debug";
const QUIET_FILTER: &str = "kiln=error,kiln_bundler=error,kiln_cli=error";
const DEFAULT_FILTER: &str = "kiln=info,kiln_bundler=info,kiln_cli=info";

/// Pick the filter directives for the given flags.
///
/// The level is determined in this order:
/// 1. `--verbose`: DEBUG for kiln crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`, if set
/// 4. INFO for kiln crates
pub fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the tracing subscriber with the specified options.
///
/// Call once at the start of the program, before any logging occurs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}
