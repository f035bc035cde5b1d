//! # kiln-bundler
//!
//! Multi-target build coordination on top of an external bundler.
//!
//! A project declares several build targets (for a desktop app: the main
//! process, its preload scripts and the renderer) that share one base
//! configuration. Kiln composes each target's configuration, creates one
//! bundler context per target concurrently, then either builds every
//! target once or keeps them all watching for changes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use kiln_bundler::{
//!     BuildFlags, Coordinator, EsbuildBundler, NativeRuntime, RunOutcome, compose_targets,
//!     desktop_base, desktop_targets,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let flags = BuildFlags::new(false, false);
//! let targets = compose_targets(&desktop_base(), &desktop_targets(), flags)?;
//!
//! let bundler = EsbuildBundler::new(Arc::new(NativeRuntime::new()), ".");
//! let coordinator = Coordinator::new(Arc::new(bundler), flags);
//!
//! if let RunOutcome::Built(summary) = coordinator.run(targets).await? {
//!     for report in &summary.reports {
//!         println!("{} -> {} ({} bytes)", report.target, report.outfile.display(), report.bytes);
//!     }
//! }
//! # Ok(()) }
//! ```
//!
//! ## Plugging in another bundler
//!
//! The coordinator only talks to the [`Bundler`] and [`BuildContext`]
//! traits. [`EsbuildBundler`] is the shipped implementation; the
//! `test-utils` feature adds recording fakes for downstream tests.

pub mod asset;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod esbuild;
pub mod join;
pub mod plugins;
pub mod runtime;
pub mod target;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests;

pub use asset::{AssetSpec, AssetStager, AssetStatus};
pub use config::{
    BuildConfiguration, BuildFlags, ConfigLayer, DEV_DEFINE, Format, Platform, SourceMapMode,
};
pub use context::{BuildContext, Bundler, RebuildReport};
pub use coordinator::{BuildSummary, Coordinator, CoordinatorState, RunOutcome, WatchSession};
pub use error::{
    AuxiliaryAssetError, BuildError, ConfigurationError, ContextCreationError, Error, Result,
};
pub use esbuild::{EsbuildBundler, EsbuildContext};
pub use plugins::{OutputPlugin, PluginSpec};
pub use runtime::{NativeRuntime, Runtime, RuntimeError};
pub use target::{
    TargetDeclaration, TargetDescriptor, compose_targets, desktop_base, desktop_targets,
    validate_targets,
};
