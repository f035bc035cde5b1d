//! Command-line arguments for one esbuild invocation.

use crate::config::SourceMapMode;
use crate::target::TargetDescriptor;

/// Arguments that build `target` once.
///
/// Paths stay relative; the process runs with the project root as its
/// working directory.
pub fn esbuild_args(target: &TargetDescriptor) -> Vec<String> {
    let config = target.config();
    let mut args = vec![config.entry.display().to_string()];

    if config.bundle {
        args.push("--bundle".to_string());
    }
    args.push(format!("--outfile={}", config.outfile.display()));
    args.push(format!("--format={}", config.format.as_str()));
    args.push(format!("--platform={}", config.platform.as_str()));

    if config.minify {
        args.push("--minify".to_string());
    }

    match config.sourcemap {
        SourceMapMode::None => {}
        SourceMapMode::Linked => args.push("--sourcemap".to_string()),
        SourceMapMode::Inline => args.push("--sourcemap=inline".to_string()),
        SourceMapMode::External => args.push("--sourcemap=external".to_string()),
    }

    if let Some(ref level) = config.target {
        args.push(format!("--target={level}"));
    }

    for (symbol, value) in &config.define {
        args.push(format!("--define:{symbol}={value}"));
    }

    for module in &config.external {
        args.push(format!("--external:{module}"));
    }

    args.push(format!("--footer:js={}", target.footer()));
    args.push("--log-level=error".to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildFlags, ConfigLayer, Format, Platform};
    use crate::target::{TargetDeclaration, TargetDescriptor};
    use indexmap::IndexMap;
    use std::path::PathBuf;

    fn target(layer: ConfigLayer, flags: BuildFlags) -> TargetDescriptor {
        let declaration = TargetDeclaration::new(
            "main-process",
            ConfigLayer {
                entry: Some(PathBuf::from("src/main.ts")),
                outfile: Some(PathBuf::from("dist/main.js")),
                ..layer
            },
        )
        .with_tag("main");
        TargetDescriptor::compose(&ConfigLayer::default(), &declaration, flags).unwrap()
    }

    #[test]
    fn test_production_args() {
        let args = esbuild_args(&target(
            ConfigLayer {
                format: Some(Format::Cjs),
                platform: Some(Platform::Node),
                sourcemap: Some(SourceMapMode::Linked),
                target: Some("node20".to_string()),
                external: Some(vec!["electron".to_string(), "sqlite3".to_string()]),
                ..ConfigLayer::default()
            },
            BuildFlags::default(),
        ));

        assert_eq!(
            args,
            vec![
                "src/main.ts",
                "--bundle",
                "--outfile=dist/main.js",
                "--format=cjs",
                "--platform=node",
                "--minify",
                "--sourcemap",
                "--target=node20",
                "--define:__DEV__=false",
                "--external:electron",
                "--external:sqlite3",
                "--footer:js=//# sourceURL=main",
                "--log-level=error",
            ]
        );
    }

    #[test]
    fn test_dev_args_skip_minify() {
        let args = esbuild_args(&target(ConfigLayer::default(), BuildFlags::new(true, false)));

        assert!(!args.contains(&"--minify".to_string()));
        assert!(args.contains(&"--define:__DEV__=true".to_string()));
    }

    #[test]
    fn test_no_bundle_and_inline_sourcemap() {
        let args = esbuild_args(&target(
            ConfigLayer {
                bundle: Some(false),
                sourcemap: Some(SourceMapMode::Inline),
                ..ConfigLayer::default()
            },
            BuildFlags::default(),
        ));

        assert!(!args.contains(&"--bundle".to_string()));
        assert!(args.contains(&"--sourcemap=inline".to_string()));
    }

    #[test]
    fn test_defines_keep_declaration_order() {
        let args = esbuild_args(&target(
            ConfigLayer {
                define: Some(IndexMap::from([
                    ("process.env.NODE_ENV".to_string(), "\"production\"".to_string()),
                    ("APP_VERSION".to_string(), "\"1.4.0\"".to_string()),
                ])),
                ..ConfigLayer::default()
            },
            BuildFlags::default(),
        ));

        let defines: Vec<_> = args.iter().filter(|a| a.starts_with("--define:")).collect();
        assert_eq!(
            defines,
            vec![
                "--define:process.env.NODE_ENV=\"production\"",
                "--define:APP_VERSION=\"1.4.0\"",
                "--define:__DEV__=false",
            ]
        );
    }
}
