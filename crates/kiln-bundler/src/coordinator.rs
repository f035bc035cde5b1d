//! Multi-target build coordinator.
//!
//! # Lifecycle
//!
//! ```text
//! Initializing ──▶ ContextsReady ──┬──▶ Watching            (until process exit)
//!                                  └──▶ OneShotBuilding ──▶ Disposed
//! ```
//!
//! Initializing validates the targets, then creates one context per target
//! while the auxiliary asset is staged alongside. Context creation is strict
//! (any failure ends the run); staging is tolerant (failure is a warning).
//! The mode is chosen once from [`BuildFlags::watch`].

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::asset::{AssetStager, AssetStatus};
use crate::config::BuildFlags;
use crate::context::{BuildContext, Bundler, RebuildReport};
use crate::error::{Error, Result};
use crate::join;
use crate::target::{TargetDescriptor, validate_targets};

/// Where a coordinator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Initializing,
    ContextsReady,
    Watching,
    OneShotBuilding,
    Disposed,
}

impl fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoordinatorState::Initializing => "initializing",
            CoordinatorState::ContextsReady => "contexts-ready",
            CoordinatorState::Watching => "watching",
            CoordinatorState::OneShotBuilding => "one-shot-building",
            CoordinatorState::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

/// Result of a one-shot run.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    /// One report per target, in declaration order
    pub reports: Vec<RebuildReport>,
    pub asset: AssetStatus,
    pub duration: Duration,
}

/// Contexts kept alive in watch mode.
///
/// There is no explicit disposal: the session lives until the process is
/// torn down.
#[derive(Debug)]
pub struct WatchSession {
    contexts: Vec<Box<dyn BuildContext>>,
    asset: AssetStatus,
}

impl WatchSession {
    /// Names of the watched targets, in declaration order.
    pub fn targets(&self) -> Vec<&str> {
        self.contexts.iter().map(|ctx| ctx.target()).collect()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn asset(&self) -> AssetStatus {
        self.asset
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    Built(BuildSummary),
    Watching(WatchSession),
}

/// Drives a set of targets through one build or a watch session.
pub struct Coordinator {
    bundler: Arc<dyn Bundler>,
    flags: BuildFlags,
    stager: Option<AssetStager>,
    state: Mutex<CoordinatorState>,
}

impl Coordinator {
    pub fn new(bundler: Arc<dyn Bundler>, flags: BuildFlags) -> Self {
        Self {
            bundler,
            flags,
            stager: None,
            state: Mutex::new(CoordinatorState::Initializing),
        }
    }

    /// Stage an auxiliary asset during initialization.
    pub fn with_asset_stager(mut self, stager: AssetStager) -> Self {
        self.stager = Some(stager);
        self
    }

    pub fn flags(&self) -> BuildFlags {
        self.flags
    }

    pub fn state(&self) -> CoordinatorState {
        *self.state.lock()
    }

    fn transition(&self, next: CoordinatorState) {
        let previous = std::mem::replace(&mut *self.state.lock(), next);
        debug!(from = %previous, to = %next, "Coordinator state change");
    }

    /// Build or watch `targets`.
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] if the target set is invalid; no context is
    ///   created.
    /// - [`Error::ContextCreation`] if any context cannot be created; no
    ///   rebuild or watch happens.
    /// - [`Error::Build`] if a one-shot rebuild or a watch activation fails.
    pub async fn run(&self, targets: Vec<TargetDescriptor>) -> Result<RunOutcome> {
        let started = Instant::now();
        self.transition(CoordinatorState::Initializing);
        validate_targets(&targets)?;

        info!(
            targets = targets.len(),
            dev = self.flags.dev,
            watch = self.flags.watch,
            "Creating build contexts"
        );

        let creation = join::settle_strict(targets.into_iter().map(|target| {
            let bundler = Arc::clone(&self.bundler);
            async move {
                let context = bundler.create_context(&target).await?;
                debug!(target_name = target.name(), "Context ready");
                Ok::<_, Error>(context)
            }
        }));
        let (contexts, asset) = tokio::join!(creation, self.stage_asset());
        let contexts = contexts?;

        self.transition(CoordinatorState::ContextsReady);

        if self.flags.watch {
            self.watch_all(contexts, asset).await
        } else {
            self.build_once(contexts, asset, started).await
        }
    }

    async fn stage_asset(&self) -> AssetStatus {
        let Some(stager) = &self.stager else {
            return AssetStatus::NotConfigured;
        };

        join::settle_tolerant("auxiliary-asset", [stager.stage()])
            .await
            .pop()
            .unwrap_or_else(|| {
                warn!("Continuing without the auxiliary asset");
                AssetStatus::Failed
            })
    }

    async fn watch_all(
        &self,
        contexts: Vec<Box<dyn BuildContext>>,
        asset: AssetStatus,
    ) -> Result<RunOutcome> {
        self.transition(CoordinatorState::Watching);

        let contexts = join::settle_strict(contexts.into_iter().map(|mut context| async move {
            context.watch().await?;
            info!(target_name = context.target(), "Watching for changes");
            Ok::<_, Error>(context)
        }))
        .await?;

        Ok(RunOutcome::Watching(WatchSession { contexts, asset }))
    }

    async fn build_once(
        &self,
        contexts: Vec<Box<dyn BuildContext>>,
        asset: AssetStatus,
        started: Instant,
    ) -> Result<RunOutcome> {
        self.transition(CoordinatorState::OneShotBuilding);

        let reports = join::settle_strict(contexts.into_iter().map(|mut context| async move {
            let result = context.rebuild().await;
            // Released on failure too, before the error propagates
            context.dispose().await;
            let report = result.map_err(Error::from)?;
            info!(
                target_name = %report.target,
                bytes = report.bytes,
                elapsed_ms = report.duration.as_millis() as u64,
                "Built"
            );
            Ok::<_, Error>(report)
        }))
        .await?;

        self.transition(CoordinatorState::Disposed);

        Ok(RunOutcome::Built(BuildSummary {
            reports,
            asset,
            duration: started.elapsed(),
        }))
    }
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("flags", &self.flags)
            .field("stager", &self.stager)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
