//! Configuration for Kiln with multi-source loading.
//!
//! Priority: Environment > File > Defaults. The defaults are the built-in
//! desktop application targets, so a project laid out the usual way needs
//! no configuration file at all.

mod loading;
mod tests;

use kiln_bundler::{AssetSpec, ConfigLayer, TargetDeclaration, desktop_base, desktop_targets};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Configuration file looked up in the project root.
pub const CONFIG_FILE: &str = "kiln.config.json";

/// Kiln configuration - loaded from kiln.config.json and `KILN_` variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KilnConfig {
    /// Settings shared by every target
    #[serde(default)]
    pub base: ConfigLayer,

    /// Build targets; each overrides the base where it differs
    #[serde(default)]
    pub targets: Vec<TargetDeclaration>,

    /// Optional native addon copied next to the bundles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetSpec>,

    /// esbuild executable, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esbuild: Option<PathBuf>,
}

impl KilnConfig {
    /// Built-in configuration: the four desktop application bundles.
    pub fn default_config() -> Self {
        Self {
            base: desktop_base(),
            targets: desktop_targets(),
            asset: None,
            esbuild: None,
        }
    }

    /// Check what the type system cannot.
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "targets".to_string(),
                value: "[]".to_string(),
                hint: "Declare at least one target, or remove 'targets' to build the default desktop bundles".to_string(),
            }
            .into());
        }

        if let Some(ref asset) = self.asset {
            if asset.source == asset.destination {
                return Err(ConfigError::InvalidValue {
                    field: "asset.destination".to_string(),
                    value: asset.destination.display().to_string(),
                    hint: "The asset must be copied somewhere other than its source".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Generate JSON Schema for kiln.config.json.
    pub fn json_schema() -> Result<serde_json::Value> {
        let schema = schemars::schema_for!(KilnConfig);
        Ok(serde_json::to_value(schema)?)
    }
}
