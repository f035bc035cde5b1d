//! Formatting utilities for sizes, durations, and build summaries.

use console::Term;
use kiln_bundler::BuildSummary;
use owo_colors::{OwoColorize, Stream, Style};
use std::path::Path;
use std::time::Duration;

/// Format file size in human-readable format.
///
/// ```
/// use kiln_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use kiln_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print one line per built target to stderr, then the totals.
///
/// Output paths are shown relative to `root`. The total time is the wall
/// time of the run, not the sum of the targets, since they build side by
/// side.
pub fn print_build_summary(summary: &BuildSummary, root: &Path) {
    let term = Term::stderr();
    let width = (term.size().1 as usize).min(80);

    let heading = Style::new().bold().underline();
    eprintln!(
        "\n{}",
        "Build Summary".if_supports_color(Stream::Stderr, |s| s.style(heading))
    );
    eprintln!("{}", "─".repeat(width));

    for report in &summary.reports {
        let outfile = report.outfile.strip_prefix(root).unwrap_or(&report.outfile);

        let name = Style::new().bright_white().bold();
        eprintln!(
            "  {} {} {} {} {}",
            "▸".if_supports_color(Stream::Stderr, |s| s.blue()),
            report.target.if_supports_color(Stream::Stderr, |s| s.style(name)),
            outfile.display().if_supports_color(Stream::Stderr, |s| s.dimmed()),
            format_size(report.bytes).if_supports_color(Stream::Stderr, |s| s.dimmed()),
            format!("({})", format_duration(report.duration))
                .if_supports_color(Stream::Stderr, |s| s.dimmed())
        );
    }

    eprintln!("{}", "─".repeat(width));

    let total_size: u64 = summary.reports.iter().map(|r| r.bytes).sum();
    eprintln!(
        "  {} {} in {}",
        "Total:".if_supports_color(Stream::Stderr, |s| s.bold()),
        format_size(total_size).if_supports_color(Stream::Stderr, |s| s.green()),
        format_duration(summary.duration).if_supports_color(Stream::Stderr, |s| s.green())
    );
}
