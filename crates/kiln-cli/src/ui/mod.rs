//! Terminal output: status lines and the build summary.
//!
//! # Examples
//!
//! ```no_run
//! use kiln_cli::ui;
//!
//! ui::info("Building 4 targets");
//! ui::success("Build complete");
//! ui::warning("Continuing without the native addon");
//! ```

mod format;
mod messages;

pub use format::{format_duration, format_size, print_build_summary};
pub use messages::{info, success, warning};

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR environment variables, falls back to
/// terminal capability detection.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Turn ANSI colors on or off for every status line and the summary.
pub fn set_color(enabled: bool) {
    owo_colors::set_override(enabled);
}
