//! Best-effort staging of the optional native addon.
//!
//! The application must stay buildable without the addon, so nothing in
//! here ever fails a run: a copy error becomes [`AuxiliaryAssetError`] and is
//! logged as a warning by the coordinator.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::AuxiliaryAssetError;
use crate::runtime::Runtime;

/// The artifact to copy and where it applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetSpec {
    /// File to copy, relative to the project root
    pub source: PathBuf,

    /// Destination inside the output tree, relative to the project root
    pub destination: PathBuf,

    /// Operating systems (`std::env::consts::OS` names) the copy applies to;
    /// empty means every platform
    #[serde(default)]
    pub platforms: Vec<String>,
}

impl AssetSpec {
    /// Whether the copy should happen on `os`.
    pub fn applies_to(&self, os: &str) -> bool {
        self.platforms.is_empty() || self.platforms.iter().any(|p| p == os)
    }
}

/// What staging did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    /// No asset configured for this run
    NotConfigured,
    /// The platform predicate was false; nothing was touched
    Skipped,
    /// The asset was copied
    Copied { bytes: u64 },
    /// The copy failed and the build went on without it
    Failed,
}

/// Copies an [`AssetSpec`] through a [`Runtime`] when the host matches.
#[derive(Debug, Clone)]
pub struct AssetStager {
    runtime: Arc<dyn Runtime>,
    spec: AssetSpec,
    root: PathBuf,
    host: String,
}

impl AssetStager {
    pub fn new(runtime: Arc<dyn Runtime>, spec: AssetSpec, root: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            spec,
            root: root.into(),
            host: std::env::consts::OS.to_string(),
        }
    }

    /// Pretend to run on `host` instead of the current OS.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn spec(&self) -> &AssetSpec {
        &self.spec
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Copy the asset if the platform predicate holds.
    ///
    /// Returns [`AssetStatus::Skipped`] without any filesystem call when the
    /// host is not listed.
    pub async fn stage(&self) -> Result<AssetStatus, AuxiliaryAssetError> {
        if !self.spec.applies_to(&self.host) {
            debug!(host = %self.host, "Auxiliary asset not applicable, skipping");
            return Ok(AssetStatus::Skipped);
        }

        let source = self.resolve(&self.spec.source);
        let destination = self.resolve(&self.spec.destination);
        let fail = |reason: String| AuxiliaryAssetError {
            source_path: source.clone(),
            destination: destination.clone(),
            reason,
        };

        if let Some(parent) = destination.parent() {
            self.runtime
                .create_dir_all(parent)
                .await
                .map_err(|e| fail(e.to_string()))?;
        }

        let bytes = self
            .runtime
            .copy_file(&source, &destination)
            .await
            .map_err(|e| fail(e.to_string()))?;

        info!(
            destination = %destination.display(),
            bytes,
            "Staged auxiliary asset"
        );
        Ok(AssetStatus::Copied { bytes })
    }
}
