//! Build command implementation.
//!
//! Loads the configuration, composes the targets and hands them to a
//! [`Coordinator`] driving esbuild. A one-shot run prints a summary; a watch
//! run keeps the session alive until Ctrl+C.

use crate::cli::Cli;
use crate::config::KilnConfig;
use crate::error::{Result, ResultExt};
use crate::ui;
use kiln_bundler::{
    AssetStager, AssetStatus, BuildFlags, Coordinator, EsbuildBundler, NativeRuntime, RunOutcome,
    Runtime, compose_targets,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Execute the build command.
///
/// # Build Process
///
/// 1. Resolve the project root and load configuration (Env > File > Defaults)
/// 2. Compose every target over the shared base
/// 3. Create all contexts while staging the native addon
/// 4. Build once, or watch until interrupted
///
/// # Errors
///
/// Configuration problems, context creation failures and (one-shot) build
/// failures. A failed addon copy is only a warning.
pub async fn execute(args: &Cli) -> Result<()> {
    let root = resolve_root(args.cwd.as_deref())?;
    let config = KilnConfig::load(&root, args.config.as_deref())?;
    let flags = args.flags();

    let targets = compose_targets(&config.base, &config.targets, flags)?;
    debug!(root = %root.display(), targets = targets.len(), "Targets composed");

    let runtime: Arc<dyn Runtime> = Arc::new(NativeRuntime::new());

    let mut bundler = EsbuildBundler::new(Arc::clone(&runtime), &root);
    if let Some(executable) = args.esbuild.as_ref().or(config.esbuild.as_ref()) {
        bundler = bundler.with_executable(root.join(executable));
    }

    let mut coordinator = Coordinator::new(Arc::new(bundler), flags);
    if let Some(spec) = config.asset.clone() {
        coordinator = coordinator.with_asset_stager(AssetStager::new(runtime, spec, &root));
    }

    ui::info(&format!(
        "Building {} targets{}",
        targets.len(),
        mode_suffix(flags)
    ));

    match coordinator.run(targets).await? {
        RunOutcome::Built(summary) => {
            report_asset(summary.asset);
            ui::print_build_summary(&summary, &root);
            ui::success(&format!(
                "Build completed in {}",
                ui::format_duration(summary.duration)
            ));
        }
        RunOutcome::Watching(session) => {
            report_asset(session.asset());
            ui::success(&format!(
                "Watching {} targets: {}",
                session.len(),
                session.targets().join(", ")
            ));
            ui::info("Press Ctrl+C to stop");

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl+C")?;

            // Contexts are left to process exit
            ui::info("Stopping");
        }
    }

    Ok(())
}

/// Absolute project root: `--cwd` if given, else the current directory.
fn resolve_root(cwd: Option<&Path>) -> Result<PathBuf> {
    let root = match cwd {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    Ok(root.canonicalize().with_path(&root)?)
}

fn mode_suffix(flags: BuildFlags) -> &'static str {
    match (flags.dev, flags.watch) {
        (false, false) => "",
        (true, false) => " (dev)",
        (false, true) => " (watch)",
        (true, true) => " (dev, watch)",
    }
}

fn report_asset(status: AssetStatus) {
    match status {
        AssetStatus::Failed => ui::warning("Auxiliary asset was not staged; continuing without it"),
        AssetStatus::Copied { bytes } => {
            ui::info(&format!("Staged auxiliary asset ({})", ui::format_size(bytes)))
        }
        AssetStatus::Skipped | AssetStatus::NotConfigured => {}
    }
}
