//! esbuild as the bundler collaborator.
//!
//! Each context owns one esbuild invocation. A rebuild runs the `esbuild`
//! executable as a child process with the project root as its working
//! directory, then runs the target's output plugins over the emitted file.
//!
//! Watch mode is driven from here rather than by `esbuild --watch`: a
//! [`SourceWatcher`] over the project root feeds a task that re-runs the
//! invocation after each debounced burst of changes. Imports can live
//! anywhere under the root, so the whole tree is watched minus the outputs.

mod args;
mod watcher;

pub use args::esbuild_args;
pub use watcher::SourceWatcher;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::context::{BuildContext, Bundler, RebuildReport};
use crate::error::{BuildError, ContextCreationError};
use crate::plugins::{self, OutputPlugin};
use crate::runtime::Runtime;
use crate::target::TargetDescriptor;

/// Quiet period before a watch rebuild starts.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Name of the esbuild executable on this platform.
const EXECUTABLE: &str = if cfg!(windows) { "esbuild.cmd" } else { "esbuild" };

/// [`Bundler`] that shells out to esbuild.
#[derive(Debug)]
pub struct EsbuildBundler {
    runtime: Arc<dyn Runtime>,
    root: PathBuf,
    executable: Option<PathBuf>,
    debounce: Duration,
}

impl EsbuildBundler {
    /// Bundler for the project at `root`.
    pub fn new(runtime: Arc<dyn Runtime>, root: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            root: root.into(),
            executable: None,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Use this executable instead of searching for one.
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The executable rebuilds will run.
    ///
    /// Resolution order: the explicit path, the project's
    /// `node_modules/.bin`, then `PATH`. When none exists the bare name is
    /// returned and the spawn error surfaces at the first rebuild.
    pub fn executable(&self) -> PathBuf {
        if let Some(ref explicit) = self.executable {
            return explicit.clone();
        }

        let local = self.root.join("node_modules").join(".bin").join(EXECUTABLE);
        if self.runtime.exists(&local) {
            return local;
        }

        std::env::var_os("PATH")
            .and_then(|paths| {
                std::env::split_paths(&paths)
                    .map(|dir| dir.join(EXECUTABLE))
                    .find(|candidate| candidate.is_file())
            })
            .unwrap_or_else(|| PathBuf::from(EXECUTABLE))
    }
}

#[async_trait]
impl Bundler for EsbuildBundler {
    async fn create_context(
        &self,
        target: &TargetDescriptor,
    ) -> Result<Box<dyn BuildContext>, ContextCreationError> {
        Ok(Box::new(self.prepare(target).await?))
    }
}

impl EsbuildBundler {
    async fn prepare(
        &self,
        target: &TargetDescriptor,
    ) -> Result<EsbuildContext, ContextCreationError> {
        let config = target.config();

        let entry = self.root.join(&config.entry);
        if !self.runtime.exists(&entry) {
            return Err(ContextCreationError::new(
                target.name(),
                format!("entry point not found: {}", entry.display()),
            ));
        }

        let outfile = self.root.join(&config.outfile);
        if let Some(outdir) = outfile.parent() {
            self.runtime
                .create_dir_all(outdir)
                .await
                .map_err(|e| ContextCreationError::new(target.name(), e.to_string()))?;
        }

        let plugins = config
            .plugins
            .iter()
            .map(|spec| spec.instantiate())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ContextCreationError::new(target.name(), format!("invalid plugin: {e}")))?;

        let executable = self.executable();
        debug!(
            target_name = target.name(),
            executable = %executable.display(),
            plugins = plugins.len(),
            "Prepared esbuild invocation"
        );

        Ok(EsbuildContext {
            invocation: Arc::new(Invocation {
                target: target.name().to_string(),
                executable,
                args: esbuild_args(target),
                root: self.root.clone(),
                outfile,
                plugins,
                runtime: Arc::clone(&self.runtime),
            }),
            debounce: self.debounce,
            task: None,
        })
    }
}

/// Everything needed to build one target, shared with the watch task.
#[derive(Debug)]
struct Invocation {
    target: String,
    executable: PathBuf,
    args: Vec<String>,
    root: PathBuf,
    outfile: PathBuf,
    plugins: Vec<Box<dyn OutputPlugin>>,
    runtime: Arc<dyn Runtime>,
}

impl Invocation {
    async fn run(&self) -> Result<RebuildReport, BuildError> {
        let started = Instant::now();

        let output = Command::new(&self.executable)
            .args(&self.args)
            .current_dir(&self.root)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                BuildError::new(
                    &self.target,
                    format!("failed to run {}: {e}", self.executable.display()),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("esbuild exited with {}", output.status)
            } else {
                stderr
            };
            return Err(BuildError::new(&self.target, message));
        }

        if !self.plugins.is_empty() {
            self.apply_plugins().await?;
        }

        let bytes = self
            .runtime
            .metadata(&self.outfile)
            .await
            .map_err(|e| BuildError::new(&self.target, e.to_string()))?
            .size;

        Ok(RebuildReport {
            target: self.target.clone(),
            outfile: self.outfile.clone(),
            bytes,
            duration: started.elapsed(),
        })
    }

    async fn apply_plugins(&self) -> Result<(), BuildError> {
        let raw = self
            .runtime
            .read_file(&self.outfile)
            .await
            .map_err(|e| BuildError::new(&self.target, e.to_string()))?;
        let code = String::from_utf8(raw).map_err(|_| {
            BuildError::new(
                &self.target,
                format!("{} is not valid UTF-8", self.outfile.display()),
            )
        })?;

        let code = plugins::apply_all(&self.plugins, code);
        self.runtime
            .write_file(&self.outfile, code.as_bytes())
            .await
            .map_err(|e| BuildError::new(&self.target, e.to_string()))
    }

    /// Rebuild and log the outcome; used once watching.
    async fn run_logged(&self) {
        match self.run().await {
            Ok(report) => info!(
                target_name = %report.target,
                bytes = report.bytes,
                elapsed_ms = report.duration.as_millis() as u64,
                "Rebuilt"
            ),
            Err(err) => error!(target_name = %self.target, "{err}"),
        }
    }

    /// Paths under the project root the watcher must not react to.
    fn outputs(&self) -> Vec<PathBuf> {
        let mut map = self.outfile.clone().into_os_string();
        map.push(".map");

        let mut ignored = vec![self.outfile.clone(), PathBuf::from(map)];
        if let Some(outdir) = self.outfile.parent() {
            // An outfile directly in the root must not mute the whole tree
            if outdir != self.root {
                ignored.push(outdir.to_path_buf());
            }
        }
        ignored
    }
}

/// Build context backed by an esbuild invocation.
#[derive(Debug)]
pub struct EsbuildContext {
    invocation: Arc<Invocation>,
    debounce: Duration,
    task: Option<JoinHandle<()>>,
}

impl EsbuildContext {
    pub fn is_watching(&self) -> bool {
        self.task.is_some()
    }
}

#[async_trait]
impl BuildContext for EsbuildContext {
    fn target(&self) -> &str {
        &self.invocation.target
    }

    async fn rebuild(&mut self) -> Result<RebuildReport, BuildError> {
        self.invocation.run().await
    }

    async fn watch(&mut self) -> Result<(), BuildError> {
        if self.task.is_some() {
            return Ok(());
        }

        let root = self.invocation.root.clone();
        let ignored = self.invocation.outputs();
        let (watcher, mut changes) = SourceWatcher::new(root, ignored).map_err(|e| {
            BuildError::new(
                &self.invocation.target,
                format!("cannot watch {}: {e}", self.invocation.root.display()),
            )
        })?;
        debug!(
            target_name = %self.invocation.target,
            root = %watcher.root().display(),
            "Watching sources"
        );

        let invocation = Arc::clone(&self.invocation);
        let debounce = self.debounce;

        self.task = Some(tokio::spawn(async move {
            let _watcher = watcher;
            invocation.run_logged().await;

            while let Some(path) = changes.recv().await {
                tokio::time::sleep(debounce).await;
                while changes.try_recv().is_ok() {}

                debug!(
                    target_name = %invocation.target,
                    path = %path.display(),
                    "Source changed"
                );
                invocation.run_logged().await;
            }
        }));

        Ok(())
    }

    async fn dispose(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            debug!(target_name = %self.invocation.target, "Stopped watching");
        }
    }
}
