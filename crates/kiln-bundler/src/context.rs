//! Capability interface of the bundler collaborator.
//!
//! The coordinator only ever needs four operations: create a context for a
//! target, rebuild it once, put it in watch mode, and dispose it. Anything
//! that can do those can drive a [`Coordinator`](crate::Coordinator).

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{BuildError, ContextCreationError};
use crate::target::TargetDescriptor;

/// Outcome of one successful rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildReport {
    pub target: String,
    pub outfile: PathBuf,
    /// Size of the emitted bundle
    pub bytes: u64,
    pub duration: Duration,
}

/// Creates build contexts.
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Prepare a context for `target`.
    ///
    /// The bundler must copy whatever it needs out of the descriptor; the
    /// context never borrows from it.
    async fn create_context(
        &self,
        target: &TargetDescriptor,
    ) -> Result<Box<dyn BuildContext>, ContextCreationError>;
}

/// A stateful build pipeline for one target.
///
/// Owned by exactly one coordinator from creation until disposal.
#[async_trait]
pub trait BuildContext: Send + std::fmt::Debug {
    /// Name of the target this context builds.
    fn target(&self) -> &str;

    /// Build once and write the output.
    async fn rebuild(&mut self) -> Result<RebuildReport, BuildError>;

    /// Start continuous mode and return without waiting for it.
    ///
    /// Failures of individual rebuilds after this returns are reported by
    /// the context itself and do not end the session.
    async fn watch(&mut self) -> Result<(), BuildError>;

    /// Release watchers, child processes and caches.
    async fn dispose(&mut self);
}
