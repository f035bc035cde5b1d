//! Status message functions for terminal output.

use owo_colors::{OwoColorize, Stream, Style};

fn status_line(symbol: &str, style: Style, message: &str) -> String {
    format!(
        "{} {}",
        symbol.if_supports_color(Stream::Stderr, |s| s.style(style)),
        message
    )
}

fn success_line(message: &str) -> String {
    status_line("✓", Style::new().green().bold(), message)
}

fn warning_line(message: &str) -> String {
    format!(
        "{} {}",
        "⚠".if_supports_color(Stream::Stderr, |s| s.style(Style::new().yellow().bold())),
        message.if_supports_color(Stream::Stderr, |m| m.yellow())
    )
}

/// Print a success message to stderr.
pub fn success(message: &str) {
    eprintln!("{}", success_line(message));
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    eprintln!("{}", status_line("ℹ", Style::new().blue().bold(), message));
}

/// Print a warning message to stderr.
///
/// ```no_run
/// use kiln_cli::ui::warning;
///
/// warning("Could not stage native/addon.node, continuing without it");
/// ```
pub fn warning(message: &str) {
    eprintln!("{}", warning_line(message));
}
