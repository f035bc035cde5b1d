//! Build target declarations and descriptors.
//!
//! A [`TargetDeclaration`] is what a user writes: a name, an optional log
//! tag and an override [`ConfigLayer`]. Composing it over the shared base and
//! resolving it yields an immutable [`TargetDescriptor`].

use path_clean::PathClean;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::config::{BuildConfiguration, BuildFlags, ConfigLayer, Format, Platform, SourceMapMode};
use crate::error::ConfigurationError;

/// One declared target, before composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TargetDeclaration {
    /// Unique target name, e.g. `main-process`
    pub name: String,

    /// Short label for logs and the debug footer (defaults to the name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Per-target overrides of the base configuration
    #[serde(flatten)]
    pub overrides: ConfigLayer,
}

impl TargetDeclaration {
    pub fn new(name: impl Into<String>, overrides: ConfigLayer) -> Self {
        Self {
            name: name.into(),
            tag: None,
            overrides,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// A named build with its composed configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDescriptor {
    name: String,
    tag: String,
    config: BuildConfiguration,
}

impl TargetDescriptor {
    pub fn new(
        name: impl Into<String>,
        tag: impl Into<String>,
        config: BuildConfiguration,
    ) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            config,
        }
    }

    /// Compose `declaration` over `base` and resolve it.
    pub fn compose(
        base: &ConfigLayer,
        declaration: &TargetDeclaration,
        flags: BuildFlags,
    ) -> Result<Self, ConfigurationError> {
        let config = base
            .compose(&declaration.overrides)
            .resolve(&declaration.name, flags)?;
        let tag = declaration
            .tag
            .clone()
            .unwrap_or_else(|| declaration.name.clone());

        Ok(Self::new(declaration.name.clone(), tag, config))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn config(&self) -> &BuildConfiguration {
        &self.config
    }

    /// Text appended to the emitted bundle.
    ///
    /// An explicit footer wins; otherwise a `sourceURL` comment naming the
    /// tag so stack traces point at the right bundle.
    pub fn footer(&self) -> String {
        self.config
            .footer
            .clone()
            .unwrap_or_else(|| format!("//# sourceURL={}", self.tag))
    }
}

/// Compose every declaration over `base`.
///
/// Fails on the first declaration that cannot be resolved, then checks the
/// set as a whole with [`validate_targets`].
pub fn compose_targets(
    base: &ConfigLayer,
    declarations: &[TargetDeclaration],
    flags: BuildFlags,
) -> Result<Vec<TargetDescriptor>, ConfigurationError> {
    let targets = declarations
        .iter()
        .map(|declaration| TargetDescriptor::compose(base, declaration, flags))
        .collect::<Result<Vec<_>, _>>()?;

    validate_targets(&targets)?;
    Ok(targets)
}

/// Check that a target set can be built side by side.
///
/// Names must be unique and no two targets may write the same file.
pub fn validate_targets(targets: &[TargetDescriptor]) -> Result<(), ConfigurationError> {
    if targets.is_empty() {
        return Err(ConfigurationError::NoTargets);
    }

    let mut names: HashSet<&str> = HashSet::with_capacity(targets.len());
    let mut outputs: HashMap<PathBuf, &str> = HashMap::with_capacity(targets.len());

    for target in targets {
        if !names.insert(target.name()) {
            return Err(ConfigurationError::DuplicateTarget(target.name().to_string()));
        }

        let outfile = target.config().outfile.clean();
        if let Some(first) = outputs.insert(outfile.clone(), target.name()) {
            return Err(ConfigurationError::DuplicateOutput {
                path: outfile,
                first: first.to_string(),
                second: target.name().to_string(),
            });
        }
    }

    Ok(())
}

/// Shared base configuration of the desktop application build.
pub fn desktop_base() -> ConfigLayer {
    ConfigLayer {
        bundle: Some(true),
        sourcemap: Some(SourceMapMode::Linked),
        external: Some(vec!["electron".to_string()]),
        ..ConfigLayer::default()
    }
}

/// The four bundles of the desktop application.
pub fn desktop_targets() -> Vec<TargetDeclaration> {
    let node = |entry: &str, outfile: &str| ConfigLayer {
        entry: Some(PathBuf::from(entry)),
        outfile: Some(PathBuf::from(outfile)),
        format: Some(Format::Cjs),
        platform: Some(Platform::Node),
        ..ConfigLayer::default()
    };

    vec![
        TargetDeclaration::new("main-process", node("src/main/index.ts", "dist/main.js"))
            .with_tag("main"),
        TargetDeclaration::new("preload", node("src/preload/index.ts", "dist/preload.js")),
        TargetDeclaration::new(
            "updater-preload",
            node("src/updater/preload.ts", "dist/updater-preload.js"),
        )
        .with_tag("updater"),
        TargetDeclaration::new(
            "renderer",
            ConfigLayer {
                entry: Some(PathBuf::from("src/renderer/index.tsx")),
                outfile: Some(PathBuf::from("dist/renderer.js")),
                format: Some(Format::Iife),
                platform: Some(Platform::Browser),
                external: Some(Vec::new()),
                ..ConfigLayer::default()
            },
        ),
    ]
}
