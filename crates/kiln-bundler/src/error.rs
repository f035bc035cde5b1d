//! Error types for build coordination.
//!
//! Every fatal failure of a run is one of [`ConfigurationError`],
//! [`ContextCreationError`] or [`BuildError`], collected under [`Error`].
//! [`AuxiliaryAssetError`] is deliberately not part of [`Error`]: the asset
//! stager reports it as a warning and the run carries on.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for a coordinator run.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// A target declaration could not be turned into a build configuration
    #[error(transparent)]
    #[diagnostic(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The bundler rejected a target while creating its context
    #[error(transparent)]
    #[diagnostic(transparent)]
    ContextCreation(#[from] ContextCreationError),

    /// A rebuild or watch activation failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Build(#[from] BuildError),

    /// A spawned build task panicked or was aborted
    #[error("Build task failed to complete: {0}")]
    #[diagnostic(code(kiln::task))]
    Task(String),
}

/// Malformed target declarations, detected before any context exists.
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A required field is missing after composition
    #[error("Target '{target}' is missing required field '{field}'")]
    #[diagnostic(
        code(kiln::config::missing_field),
        help("Set '{field}' on the target or in the shared base configuration")
    )]
    MissingField {
        /// Target name
        target: String,
        /// Name of the missing field
        field: &'static str,
    },

    /// Two targets write the same output file
    #[error("Targets '{first}' and '{second}' both write {}", .path.display())]
    #[diagnostic(
        code(kiln::config::duplicate_output),
        help("Every target needs its own output path")
    )]
    DuplicateOutput {
        /// Shared output path
        path: PathBuf,
        /// Target declared first
        first: String,
        /// Target declared second
        second: String,
    },

    /// Two targets share a name
    #[error("Target name '{0}' is declared more than once")]
    #[diagnostic(code(kiln::config::duplicate_target))]
    DuplicateTarget(String),

    /// Nothing to build
    #[error("No build targets declared")]
    #[diagnostic(
        code(kiln::config::no_targets),
        help("Add at least one entry to 'targets'")
    )]
    NoTargets,

    /// A field holds a value that cannot be used
    #[error("Invalid value for '{field}' in target '{target}': {value}")]
    #[diagnostic(code(kiln::config::invalid_value))]
    InvalidValue {
        /// Target name
        target: String,
        /// Field name
        field: &'static str,
        /// Offending value
        value: String,
    },
}

/// The bundler collaborator refused to create a context for a target.
#[derive(Debug, Error, Diagnostic)]
#[error("Failed to create build context for '{target}': {reason}")]
#[diagnostic(code(kiln::context))]
pub struct ContextCreationError {
    /// Target name
    pub target: String,
    /// Why the collaborator refused
    pub reason: String,
}

impl ContextCreationError {
    pub fn new(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// A rebuild (or watch activation) failed for a target.
#[derive(Debug, Error, Diagnostic)]
#[error("Build failed for '{target}': {message}")]
#[diagnostic(code(kiln::build))]
pub struct BuildError {
    /// Target name
    pub target: String,
    /// Bundler output describing the failure
    pub message: String,
}

impl BuildError {
    pub fn new(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            message: message.into(),
        }
    }
}

/// Copying the optional auxiliary artifact failed.
#[derive(Debug, Error)]
#[error("Could not stage {} -> {}: {reason}", .source_path.display(), .destination.display())]
pub struct AuxiliaryAssetError {
    /// File that was being copied
    pub source_path: PathBuf,
    /// Where it was going
    pub destination: PathBuf,
    /// Underlying failure
    pub reason: String,
}

/// Result type alias using [`Error`] as the default error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
