//! Kiln CLI entry point.
//!
//! Parses arguments, sets up logging and hands off to the build command.

use clap::Parser;
use kiln_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let color = !args.no_color && ui::should_use_color();
    ui::set_color(color);
    logger::init_logger(args.verbose, args.quiet, !color);

    let result = if args.print_schema {
        commands::print_schema()
    } else {
        commands::build_execute(&args).await
    };

    // Rendered by miette; a returned error exits non-zero
    result.map_err(error::cli_error_to_miette)
}
