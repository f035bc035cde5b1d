//! Recording collaborators for tests.
//!
//! [`RecordingBundler`] hands out contexts that log every lifecycle call into
//! a shared [`CallLog`]; [`RecordingRuntime`] is an in-memory filesystem that
//! counts operations.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::context::{BuildContext, Bundler, RebuildReport};
use crate::error::{BuildError, ContextCreationError};
use crate::runtime::{FileMetadata, Runtime, RuntimeError, RuntimeResult};
use crate::target::TargetDescriptor;

/// A lifecycle call made against the bundler collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    CreateContext,
    Rebuild,
    Watch,
    Dispose,
}

/// One logged call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub kind: CallKind,
    pub target: String,
    /// Minify flag of the configuration the context was created with
    pub minify: bool,
}

/// Shared, ordered log of collaborator calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    fn push(&self, kind: CallKind, target: &str, minify: bool) {
        self.calls.lock().push(Call {
            kind,
            target: target.to_string(),
            minify,
        });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.calls.lock().iter().filter(|c| c.kind == kind).count()
    }

    /// Targets that received `kind`, in call order.
    pub fn targets(&self, kind: CallKind) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.target.clone())
            .collect()
    }
}

/// Bundler collaborator that records instead of bundling.
#[derive(Debug, Default)]
pub struct RecordingBundler {
    log: CallLog,
    fail_create: HashSet<String>,
    fail_rebuild: HashSet<String>,
    rebuild_delay: HashMap<String, Duration>,
}

impl RecordingBundler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject context creation for `target`.
    pub fn fail_create(mut self, target: &str) -> Self {
        self.fail_create.insert(target.to_string());
        self
    }

    /// Make every rebuild of `target` fail.
    pub fn fail_rebuild(mut self, target: &str) -> Self {
        self.fail_rebuild.insert(target.to_string());
        self
    }

    /// Delay rebuilds of `target`.
    pub fn delay_rebuild(mut self, target: &str, delay: Duration) -> Self {
        self.rebuild_delay.insert(target.to_string(), delay);
        self
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

#[async_trait]
impl Bundler for RecordingBundler {
    async fn create_context(
        &self,
        target: &TargetDescriptor,
    ) -> Result<Box<dyn BuildContext>, ContextCreationError> {
        let minify = target.config().minify;
        self.log.push(CallKind::CreateContext, target.name(), minify);

        if self.fail_create.contains(target.name()) {
            return Err(ContextCreationError::new(target.name(), "rejected by test"));
        }

        Ok(Box::new(RecordingContext {
            target: target.name().to_string(),
            outfile: target.config().outfile.clone(),
            minify,
            log: self.log.clone(),
            fail_rebuild: self.fail_rebuild.contains(target.name()),
            delay: self.rebuild_delay.get(target.name()).copied(),
        }))
    }
}

#[derive(Debug)]
struct RecordingContext {
    target: String,
    outfile: PathBuf,
    minify: bool,
    log: CallLog,
    fail_rebuild: bool,
    delay: Option<Duration>,
}

#[async_trait]
impl BuildContext for RecordingContext {
    fn target(&self) -> &str {
        &self.target
    }

    async fn rebuild(&mut self) -> Result<RebuildReport, BuildError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.push(CallKind::Rebuild, &self.target, self.minify);

        if self.fail_rebuild {
            return Err(BuildError::new(&self.target, "syntax error"));
        }
        Ok(RebuildReport {
            target: self.target.clone(),
            outfile: self.outfile.clone(),
            bytes: 0,
            duration: Duration::ZERO,
        })
    }

    async fn watch(&mut self) -> Result<(), BuildError> {
        self.log.push(CallKind::Watch, &self.target, self.minify);
        Ok(())
    }

    async fn dispose(&mut self) {
        self.log.push(CallKind::Dispose, &self.target, self.minify);
    }
}

/// In-memory [`Runtime`] counting every call.
#[derive(Debug, Default)]
pub struct RecordingRuntime {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    copies: AtomicUsize,
    calls: AtomicUsize,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.lock().insert(path.into(), content.into());
    }

    pub fn copy_calls(&self) -> usize {
        self.copies.load(Ordering::SeqCst)
    }

    /// Async operations performed (`exists` is not counted).
    pub fn total_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Runtime for RecordingRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        self.tick();
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| RuntimeError::FileNotFound(path.to_path_buf()))
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        self.tick();
        self.files
            .lock()
            .insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> RuntimeResult<u64> {
        self.tick();
        self.copies.fetch_add(1, Ordering::SeqCst);

        let mut files = self.files.lock();
        let content = files
            .get(from)
            .cloned()
            .ok_or_else(|| RuntimeError::FileNotFound(from.to_path_buf()))?;
        let bytes = content.len() as u64;
        files.insert(to.to_path_buf(), content);
        Ok(bytes)
    }

    async fn create_dir_all(&self, _path: &Path) -> RuntimeResult<()> {
        self.tick();
        Ok(())
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        self.tick();
        self.files
            .lock()
            .get(path)
            .map(|content| FileMetadata {
                size: content.len() as u64,
            })
            .ok_or_else(|| RuntimeError::FileNotFound(path.to_path_buf()))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().contains_key(path)
    }
}
