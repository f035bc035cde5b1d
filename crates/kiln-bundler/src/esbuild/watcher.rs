//! Source watcher for one target.
//!
//! Watches the project root and forwards relevant changes through a
//! channel. Output files, `node_modules` and hidden paths are ignored so a
//! rebuild never triggers itself.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Channel capacity; bursts beyond this are dropped since one rebuild
/// covers them anyway.
const CHANNEL_CAPACITY: usize = 64;

/// Recursive watcher over a source directory.
///
/// Dropping it stops the underlying notify watcher.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl SourceWatcher {
    /// Start watching `root`, skipping anything under `ignored`.
    pub fn new(
        root: PathBuf,
        ignored: Vec<PathBuf>,
    ) -> notify::Result<(Self, mpsc::Receiver<PathBuf>)> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let filter_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };
            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                return;
            }

            for path in event.paths {
                if Self::should_ignore(&path, &filter_root, &ignored) {
                    continue;
                }
                // Full channel means a rebuild is already pending
                let _ = tx.try_send(path);
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    fn should_ignore(path: &Path, root: &Path, ignored: &[PathBuf]) -> bool {
        let Ok(relative) = path.strip_prefix(root) else {
            return true;
        };

        if ignored.iter().any(|dir| path.starts_with(dir)) {
            return true;
        }

        relative.components().any(|component| {
            component.as_os_str().to_str().is_some_and(|name| {
                name == "node_modules" || (name.starts_with('.') && name != "." && name != "..")
            })
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl std::fmt::Debug for SourceWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceWatcher")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
