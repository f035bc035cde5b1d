//! Output plugins.
//!
//! Plugins run after the bundler has emitted a target's output file and
//! rewrite its contents, in the order they are declared.

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Declarative plugin entry as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PluginSpec {
    /// Replace every match of a regular expression
    Replace {
        /// Regular expression to search for
        search: String,
        /// Replacement text (`$1` style group references allowed)
        replace: String,
    },
    /// Prepend a line of text
    Banner {
        text: String,
    },
}

impl PluginSpec {
    /// Build the plugin this entry describes.
    pub fn instantiate(&self) -> Result<Box<dyn OutputPlugin>, regex::Error> {
        Ok(match self {
            PluginSpec::Replace { search, replace } => {
                Box::new(ReplacePlugin::new(search, replace.clone())?)
            }
            PluginSpec::Banner { text } => Box::new(BannerPlugin { text: text.clone() }),
        })
    }
}

/// Rewrites emitted bundle text.
pub trait OutputPlugin: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn transform(&self, code: &str) -> String;
}

#[derive(Debug)]
pub struct ReplacePlugin {
    pattern: Regex,
    replacement: String,
}

impl ReplacePlugin {
    pub fn new(search: &str, replacement: String) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(search)?,
            replacement,
        })
    }
}

impl OutputPlugin for ReplacePlugin {
    fn name(&self) -> &str {
        "replace"
    }

    fn transform(&self, code: &str) -> String {
        self.pattern
            .replace_all(code, self.replacement.as_str())
            .into_owned()
    }
}

#[derive(Debug)]
pub struct BannerPlugin {
    text: String,
}

impl OutputPlugin for BannerPlugin {
    fn name(&self) -> &str {
        "banner"
    }

    fn transform(&self, code: &str) -> String {
        format!("{}\n{}", self.text, code)
    }
}

/// Run `plugins` over `code` in order.
pub fn apply_all(plugins: &[Box<dyn OutputPlugin>], code: String) -> String {
    plugins.iter().fold(code, |code, plugin| {
        trace!(plugin = plugin.name(), "Applying output plugin");
        plugin.transform(&code)
    })
}
