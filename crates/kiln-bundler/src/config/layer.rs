use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{BuildConfiguration, BuildFlags, DEV_DEFINE, Format, Platform, SourceMapMode};
use crate::error::ConfigurationError;
use crate::plugins::PluginSpec;

/// Partial build configuration.
///
/// Used both for the shared base and for per-target overrides. A field left
/// as `None` is "not set by this layer".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigLayer {
    /// Entry point, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<PathBuf>,

    /// Output file, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outfile: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sourcemap: Option<SourceMapMode>,

    /// Compile-time replacements (`"process.env.NODE_ENV": "\"production\""`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub define: Option<IndexMap<String, String>>,

    /// Modules excluded from the bundle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<PluginSpec>>,

    /// Text appended to the bundle; defaults to a debug identifier comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,

    /// Language level passed to the bundler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Inline dependencies into the output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<bool>,
}

fn pick<T: Clone>(base: &Option<T>, overrides: &Option<T>) -> Option<T> {
    overrides.as_ref().or(base.as_ref()).cloned()
}

impl ConfigLayer {
    /// Overlay `overrides` on top of `self`.
    ///
    /// Fields set in `overrides` win; everything else comes from `self`.
    /// Maps and lists are replaced as a whole, never merged element-wise.
    pub fn compose(&self, overrides: &ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            entry: pick(&self.entry, &overrides.entry),
            outfile: pick(&self.outfile, &overrides.outfile),
            format: pick(&self.format, &overrides.format),
            platform: pick(&self.platform, &overrides.platform),
            minify: pick(&self.minify, &overrides.minify),
            sourcemap: pick(&self.sourcemap, &overrides.sourcemap),
            define: pick(&self.define, &overrides.define),
            external: pick(&self.external, &overrides.external),
            plugins: pick(&self.plugins, &overrides.plugins),
            footer: pick(&self.footer, &overrides.footer),
            target: pick(&self.target, &overrides.target),
            bundle: pick(&self.bundle, &overrides.bundle),
        }
    }

    /// Turn a composed layer into a complete configuration for `target`.
    ///
    /// `flags.dev` forces minification off and the development define is
    /// added unless the layer already sets it.
    pub fn resolve(
        &self,
        target: &str,
        flags: BuildFlags,
    ) -> Result<BuildConfiguration, ConfigurationError> {
        let entry = self
            .entry
            .clone()
            .ok_or_else(|| ConfigurationError::MissingField {
                target: target.to_string(),
                field: "entry",
            })?;
        let outfile = self
            .outfile
            .clone()
            .ok_or_else(|| ConfigurationError::MissingField {
                target: target.to_string(),
                field: "outfile",
            })?;

        if entry == outfile {
            return Err(ConfigurationError::InvalidValue {
                target: target.to_string(),
                field: "outfile",
                value: outfile.display().to_string(),
            });
        }

        let mut define = self.define.clone().unwrap_or_default();
        define
            .entry(DEV_DEFINE.to_string())
            .or_insert_with(|| flags.dev.to_string());

        Ok(BuildConfiguration {
            entry,
            outfile,
            format: self.format.unwrap_or(Format::Esm),
            platform: self.platform.unwrap_or(Platform::Browser),
            minify: !flags.dev && self.minify.unwrap_or(true),
            sourcemap: self.sourcemap.unwrap_or(SourceMapMode::None),
            define,
            external: self.external.clone().unwrap_or_default(),
            plugins: self.plugins.clone().unwrap_or_default(),
            footer: self.footer.clone(),
            target: self.target.clone(),
            bundle: self.bundle.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(entry: &str, outfile: &str) -> ConfigLayer {
        ConfigLayer {
            entry: Some(PathBuf::from(entry)),
            outfile: Some(PathBuf::from(outfile)),
            ..ConfigLayer::default()
        }
    }

    #[test]
    fn test_override_replaces_scalar() {
        let base = ConfigLayer {
            format: Some(Format::Esm),
            minify: Some(true),
            ..ConfigLayer::default()
        };
        let overrides = ConfigLayer {
            format: Some(Format::Cjs),
            ..ConfigLayer::default()
        };

        let composed = base.compose(&overrides);
        assert_eq!(composed.format, Some(Format::Cjs));
        assert_eq!(composed.minify, Some(true));
    }

    #[test]
    fn test_override_adds_absent_field() {
        let base = ConfigLayer::default();
        let overrides = layer("src/main.ts", "dist/main.js");

        let composed = base.compose(&overrides);
        assert_eq!(composed.entry, Some(PathBuf::from("src/main.ts")));
        assert_eq!(composed.outfile, Some(PathBuf::from("dist/main.js")));
    }

    #[test]
    fn test_lists_are_replaced_not_merged() {
        let base = ConfigLayer {
            external: Some(vec!["electron".to_string()]),
            define: Some(IndexMap::from([("A".to_string(), "1".to_string())])),
            ..ConfigLayer::default()
        };
        let overrides = ConfigLayer {
            external: Some(vec!["fsevents".to_string()]),
            define: Some(IndexMap::from([("B".to_string(), "2".to_string())])),
            ..ConfigLayer::default()
        };

        let composed = base.compose(&overrides);
        assert_eq!(composed.external, Some(vec!["fsevents".to_string()]));
        let define = composed.define.unwrap();
        assert!(define.contains_key("B"));
        assert!(!define.contains_key("A"));
    }

    #[test]
    fn test_composed_copies_are_independent() {
        let base = ConfigLayer {
            external: Some(vec!["electron".to_string()]),
            ..ConfigLayer::default()
        };
        let mut first = base.compose(&layer("a.ts", "a.js"));
        let second = base.compose(&layer("b.ts", "b.js"));

        first
            .external
            .as_mut()
            .unwrap()
            .push("sqlite3".to_string());

        assert_eq!(second.external, Some(vec!["electron".to_string()]));
        assert_eq!(base.external, Some(vec!["electron".to_string()]));
    }

    #[test]
    fn test_resolve_requires_entry() {
        let err = ConfigLayer {
            outfile: Some(PathBuf::from("dist/a.js")),
            ..ConfigLayer::default()
        }
        .resolve("a", BuildFlags::default())
        .unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::MissingField {
                target: "a".to_string(),
                field: "entry"
            }
        );
    }

    #[test]
    fn test_resolve_requires_outfile() {
        let err = ConfigLayer {
            entry: Some(PathBuf::from("a.ts")),
            ..ConfigLayer::default()
        }
        .resolve("a", BuildFlags::default())
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigurationError::MissingField { field: "outfile", .. }
        ));
    }

    #[test]
    fn test_resolve_rejects_outfile_equal_to_entry() {
        let err = layer("a.js", "a.js")
            .resolve("a", BuildFlags::default())
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
    }

    #[test]
    fn test_resolve_defaults() {
        let config = layer("a.ts", "a.js")
            .resolve("a", BuildFlags::default())
            .unwrap();

        assert_eq!(config.format, Format::Esm);
        assert_eq!(config.platform, Platform::Browser);
        assert_eq!(config.sourcemap, SourceMapMode::None);
        assert!(config.minify);
        assert!(config.bundle);
        assert_eq!(config.define.get(DEV_DEFINE).map(String::as_str), Some("false"));
    }

    #[test]
    fn test_dev_flag_disables_minify_and_defines() {
        let config = ConfigLayer {
            minify: Some(true),
            ..layer("a.ts", "a.js")
        }
        .resolve("a", BuildFlags::new(true, false))
        .unwrap();

        assert!(!config.minify);
        assert_eq!(config.define.get(DEV_DEFINE).map(String::as_str), Some("true"));
    }

    #[test]
    fn test_explicit_dev_define_is_kept() {
        let config = ConfigLayer {
            define: Some(IndexMap::from([(
                DEV_DEFINE.to_string(),
                "globalThis.debug".to_string(),
            )])),
            ..layer("a.ts", "a.js")
        }
        .resolve("a", BuildFlags::new(true, false))
        .unwrap();

        assert_eq!(
            config.define.get(DEV_DEFINE).map(String::as_str),
            Some("globalThis.debug")
        );
    }

    #[test]
    fn test_layer_deserializes_camel_case() {
        let layer: ConfigLayer = serde_json::from_str(
            r#"{
                "entry": "src/preload.ts",
                "outfile": "dist/preload.js",
                "format": "cjs",
                "platform": "node",
                "sourcemap": "linked",
                "define": { "process.env.NODE_ENV": "\"production\"" },
                "external": ["electron"]
            }"#,
        )
        .unwrap();

        assert_eq!(layer.format, Some(Format::Cjs));
        assert_eq!(layer.platform, Some(Platform::Node));
        assert_eq!(layer.sourcemap, Some(SourceMapMode::Linked));
        assert_eq!(layer.external, Some(vec!["electron".to_string()]));
        assert!(layer.minify.is_none());
    }
}
