//! Build configuration model.
//!
//! A target's configuration is written as [`ConfigLayer`]s (every field
//! optional) that are overlaid with [`ConfigLayer::compose`] and then
//! resolved into a complete [`BuildConfiguration`].

mod layer;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::plugins::PluginSpec;

pub use layer::ConfigLayer;

/// Define key through which bundled code sees development mode.
pub const DEV_DEFINE: &str = "__DEV__";

/// Output module format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// CommonJS
    Cjs,
    /// Immediately invoked function expression
    Iife,
    /// ECMAScript modules
    Esm,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Cjs => "cjs",
            Format::Iife => "iife",
            Format::Esm => "esm",
        }
    }
}

/// Runtime the bundle is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Node,
    Browser,
    Neutral,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Node => "node",
            Platform::Browser => "browser",
            Platform::Neutral => "neutral",
        }
    }
}

/// Source map generation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceMapMode {
    /// No source map
    None,
    /// Embedded as a data URL in the bundle
    Inline,
    /// Separate `.map` file referenced from the bundle
    Linked,
    /// Separate `.map` file without a reference comment
    External,
}

/// Invocation flags, resolved once at startup and passed by value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildFlags {
    /// Development build: no minification, `__DEV__` is `true`
    pub dev: bool,
    /// Keep contexts alive and rebuild on change instead of building once
    pub watch: bool,
}

impl BuildFlags {
    pub fn new(dev: bool, watch: bool) -> Self {
        Self { dev, watch }
    }
}

/// Fully resolved configuration of one build target.
///
/// Handed to the bundler by reference; the bundler keeps its own copy, so
/// nothing here changes once a context exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfiguration {
    pub entry: PathBuf,
    pub outfile: PathBuf,
    pub format: Format,
    pub platform: Platform,
    pub minify: bool,
    pub sourcemap: SourceMapMode,
    /// Symbol -> literal replacement, in declaration order
    pub define: IndexMap<String, String>,
    /// Module names left for the runtime to resolve
    pub external: Vec<String>,
    /// Output transforms, applied in order
    pub plugins: Vec<PluginSpec>,
    pub footer: Option<String>,
    /// Language level, e.g. `es2022` or `node20`
    pub target: Option<String>,
    pub bundle: bool,
}
