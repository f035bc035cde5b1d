use crate::config::{CONFIG_FILE, KilnConfig};
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use std::path::{Path, PathBuf};
use tracing::debug;

impl KilnConfig {
    /// Load configuration for the project at `root`.
    ///
    /// Priority: environment variables > config file > defaults. Without an
    /// explicit `config_path`, `kiln.config.json` in `root` is used if it
    /// exists; an explicit path that does not exist is an error.
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default_config()));

        if let Some(path) = Self::locate(root, config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            figment = figment.merge(Json::file(path));
        }

        // KILN_ESBUILD, KILN_BASE_MINIFY, ...
        figment = figment.merge(Env::prefixed("KILN_").split("_").filter(|key| {
            let key = key.as_str().to_ascii_lowercase();
            key == "esbuild" || key.starts_with("base.")
        }));

        let config: Self = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            value: e.to_string(),
            hint: "Check kiln.config.json syntax and field types".to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn locate(root: &Path, config_path: Option<&Path>) -> Result<Option<PathBuf>> {
        match config_path {
            Some(path) => {
                let path = root.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Ok(Some(path))
            }
            None => {
                let default_path = root.join(CONFIG_FILE);
                Ok(default_path.is_file().then_some(default_path))
            }
        }
    }
}
