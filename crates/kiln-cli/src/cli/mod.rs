//! Command-line interface definition for Kiln.
//!
//! Kiln has a single job, so there are no subcommands: a bare `kiln` builds
//! every target once, `kiln --watch` keeps them rebuilding.


use clap::Parser;
use kiln_bundler::BuildFlags;
use std::path::PathBuf;

/// Kiln - multi-target build coordinator for desktop apps
#[derive(Parser, Debug)]
#[command(
    name = "kiln",
    version,
    about = "Build every bundle of a desktop app in one go",
    long_about = "Kiln builds the main process, preload scripts and renderer of a desktop\n\
                  application side by side with esbuild. Targets share one base\n\
                  configuration and override what differs. Use --watch to keep every\n\
                  target rebuilding on change."
)]
pub struct Cli {
    /// Development build
    ///
    /// Skips minification and sets the `__DEV__` define to `true`.
    #[arg(long)]
    pub dev: bool,

    /// Keep rebuilding on source changes until interrupted
    #[arg(short, long)]
    pub watch: bool,

    /// Configuration file (default: kiln.config.json in the project root)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project root (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// esbuild executable to run instead of searching for one
    #[arg(long, value_name = "PATH")]
    pub esbuild: Option<PathBuf>,

    /// Print the JSON schema of the configuration file and exit
    #[arg(long, conflicts_with_all = ["dev", "watch"])]
    pub print_schema: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Invocation flags handed to the coordinator.
    pub fn flags(&self) -> BuildFlags {
        BuildFlags::new(self.dev, self.watch)
    }
}
