#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::error::CliError;
    use kiln_bundler::{Format, Platform, SourceMapMode};
    use serial_test::serial;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_config(dir: &Path, json: &str) {
        fs::write(dir.join(CONFIG_FILE), json).unwrap();
    }

    #[test]
    #[serial]
    fn test_defaults_without_file() {
        let temp = TempDir::new().unwrap();
        let config = KilnConfig::load(temp.path(), None).unwrap();

        assert_eq!(config, KilnConfig::default_config());
        let names: Vec<_> = config.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            ["main-process", "preload", "updater-preload", "renderer"]
        );
    }

    #[test]
    #[serial]
    fn test_file_targets_replace_defaults() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"{
                "targets": [
                    { "name": "worker", "entry": "src/worker.ts", "outfile": "dist/worker.js", "format": "esm" }
                ]
            }"#,
        );

        let config = KilnConfig::load(temp.path(), None).unwrap();

        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.targets[0].name, "worker");
        assert_eq!(config.targets[0].overrides.format, Some(Format::Esm));
    }

    #[test]
    #[serial]
    fn test_file_base_merges_over_defaults() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"{ "base": { "target": "es2022", "sourcemap": "inline" } }"#,
        );

        let config = KilnConfig::load(temp.path(), None).unwrap();

        assert_eq!(config.base.target.as_deref(), Some("es2022"));
        assert_eq!(config.base.sourcemap, Some(SourceMapMode::Inline));
        // Untouched keys keep the built-in value
        assert_eq!(config.base.external, Some(vec!["electron".to_string()]));
    }

    #[test]
    #[serial]
    fn test_asset_and_esbuild_from_file() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"{
                "asset": { "source": "native/addon.node", "destination": "dist/addon.node", "platforms": ["linux"] },
                "esbuild": "tools/esbuild"
            }"#,
        );

        let config = KilnConfig::load(temp.path(), None).unwrap();

        let asset = config.asset.unwrap();
        assert_eq!(asset.source, PathBuf::from("native/addon.node"));
        assert_eq!(asset.platforms, ["linux"]);
        assert_eq!(config.esbuild, Some(PathBuf::from("tools/esbuild")));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), r#"{ "esbuild": "from-file" }"#);

        unsafe {
            std::env::set_var("KILN_ESBUILD", "from-env");
            std::env::set_var("KILN_BASE_MINIFY", "false");
        }
        let result = KilnConfig::load(temp.path(), None);
        unsafe {
            std::env::remove_var("KILN_ESBUILD");
            std::env::remove_var("KILN_BASE_MINIFY");
        }

        let config = result.unwrap();
        assert_eq!(config.esbuild, Some(PathBuf::from("from-env")));
        assert_eq!(config.base.minify, Some(false));
    }

    #[test]
    #[serial]
    fn test_unrelated_env_ignored() {
        let temp = TempDir::new().unwrap();

        unsafe {
            std::env::set_var("KILN_LOG_STYLE", "plain");
        }
        let result = KilnConfig::load(temp.path(), None);
        unsafe {
            std::env::remove_var("KILN_LOG_STYLE");
        }

        assert!(result.is_ok());
    }

    #[test]
    #[serial]
    fn test_explicit_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = KilnConfig::load(temp.path(), Some(Path::new("missing.json"))).unwrap_err();

        assert!(matches!(err, CliError::Config(ConfigError::NotFound(_))));
    }

    #[test]
    #[serial]
    fn test_explicit_file_path() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("build")).unwrap();
        fs::write(
            temp.path().join("build/kiln.json"),
            r#"{ "base": { "platform": "neutral" } }"#,
        )
        .unwrap();

        let config = KilnConfig::load(temp.path(), Some(Path::new("build/kiln.json"))).unwrap();
        assert_eq!(config.base.platform, Some(Platform::Neutral));
    }

    #[test]
    #[serial]
    fn test_invalid_field_type() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), r#"{ "base": { "minify": "yes please" } }"#);

        let err = KilnConfig::load(temp.path(), None).unwrap_err();
        assert!(matches!(
            err,
            CliError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_unknown_top_level_key() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), r#"{ "outDir": "dist" }"#);

        assert!(KilnConfig::load(temp.path(), None).is_err());
    }

    #[test]
    fn test_validation() {
        assert!(KilnConfig::default_config().validate().is_ok());

        let empty = KilnConfig {
            targets: vec![],
            ..KilnConfig::default_config()
        };
        assert!(empty.validate().is_err());

        let self_copy = KilnConfig {
            asset: Some(kiln_bundler::AssetSpec {
                source: PathBuf::from("addon.node"),
                destination: PathBuf::from("addon.node"),
                platforms: vec![],
            }),
            ..KilnConfig::default_config()
        };
        assert!(self_copy.validate().is_err());
    }

    #[test]
    fn test_json_schema() {
        let schema = KilnConfig::json_schema().unwrap();
        let properties = schema.get("properties").unwrap();

        assert!(properties.get("base").is_some());
        assert!(properties.get("targets").is_some());
        assert!(properties.get("asset").is_some());
        assert!(properties.get("esbuild").is_some());
    }
}
