//! Property-based tests for configuration composition and the coordinator
//! lifecycle.

use indexmap::IndexMap;
use proptest::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{BuildFlags, ConfigLayer, Format, Platform, SourceMapMode};
use crate::coordinator::Coordinator;
use crate::plugins::PluginSpec;
use crate::target::{TargetDeclaration, compose_targets};
use crate::test_utils::{CallKind, RecordingBundler};

fn format_strategy() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::Cjs), Just(Format::Iife), Just(Format::Esm)]
}

fn platform_strategy() -> impl Strategy<Value = Platform> {
    prop_oneof![
        Just(Platform::Node),
        Just(Platform::Browser),
        Just(Platform::Neutral)
    ]
}

fn sourcemap_strategy() -> impl Strategy<Value = SourceMapMode> {
    prop_oneof![
        Just(SourceMapMode::None),
        Just(SourceMapMode::Inline),
        Just(SourceMapMode::Linked),
        Just(SourceMapMode::External)
    ]
}

/// Layers with a random subset of fields set.
fn layer_strategy() -> impl Strategy<Value = ConfigLayer> {
    (
        (
            prop::option::of("[a-z]{1,8}\\.ts".prop_map(PathBuf::from)),
            prop::option::of("dist/[a-z]{1,8}\\.js".prop_map(PathBuf::from)),
            prop::option::of(format_strategy()),
            prop::option::of(platform_strategy()),
            prop::option::of(any::<bool>()),
            prop::option::of(sourcemap_strategy()),
        ),
        (
            prop::option::of(
                prop::collection::vec(("[A-Z_]{1,6}", "[a-z0-9]{1,4}"), 0..4)
                    .prop_map(|pairs| pairs.into_iter().collect::<IndexMap<_, _>>()),
            ),
            prop::option::of(prop::collection::vec("[a-z]{1,8}", 0..4)),
            prop::option::of(
                prop::collection::vec("[a-z ]{1,12}", 0..3).prop_map(|texts| {
                    texts
                        .into_iter()
                        .map(|text| PluginSpec::Banner { text })
                        .collect::<Vec<_>>()
                }),
            ),
            prop::option::of("/\\* [a-z]{1,8} \\*/"),
            prop::option::of("es20[12][0-9]"),
            prop::option::of(any::<bool>()),
        ),
    )
        .prop_map(
            |(
                (entry, outfile, format, platform, minify, sourcemap),
                (define, external, plugins, footer, target, bundle),
            )| ConfigLayer {
                entry,
                outfile,
                format,
                platform,
                minify,
                sourcemap,
                define,
                external,
                plugins,
                footer,
                target,
                bundle,
            },
        )
}

/// Check one field of a composed layer against its inputs.
fn assert_field<T: PartialEq + std::fmt::Debug>(
    composed: &Option<T>,
    base: &Option<T>,
    overrides: &Option<T>,
) -> Result<(), TestCaseError> {
    match overrides {
        Some(_) => {
            prop_assert_eq!(composed, overrides);
        }
        None => {
            prop_assert_eq!(composed, base);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Override keys win, base-only keys survive, inputs are untouched.
    #[test]
    fn prop_compose_override_wins(base in layer_strategy(), overrides in layer_strategy()) {
        let base_before = base.clone();
        let overrides_before = overrides.clone();

        let composed = base.compose(&overrides);

        assert_field(&composed.entry, &base.entry, &overrides.entry)?;
        assert_field(&composed.outfile, &base.outfile, &overrides.outfile)?;
        assert_field(&composed.format, &base.format, &overrides.format)?;
        assert_field(&composed.platform, &base.platform, &overrides.platform)?;
        assert_field(&composed.minify, &base.minify, &overrides.minify)?;
        assert_field(&composed.sourcemap, &base.sourcemap, &overrides.sourcemap)?;
        assert_field(&composed.define, &base.define, &overrides.define)?;
        assert_field(&composed.external, &base.external, &overrides.external)?;
        assert_field(&composed.plugins, &base.plugins, &overrides.plugins)?;
        assert_field(&composed.footer, &base.footer, &overrides.footer)?;
        assert_field(&composed.target, &base.target, &overrides.target)?;
        assert_field(&composed.bundle, &base.bundle, &overrides.bundle)?;

        prop_assert_eq!(base, base_before);
        prop_assert_eq!(overrides, overrides_before);
    }

    /// Composing over an empty layer is the identity, both ways.
    #[test]
    fn prop_compose_empty_identity(layer in layer_strategy()) {
        prop_assert_eq!(layer.compose(&ConfigLayer::default()), layer.clone());
        prop_assert_eq!(ConfigLayer::default().compose(&layer), layer);
    }

    /// One-shot runs rebuild and dispose every context exactly once; watch
    /// runs watch every context exactly once and never dispose.
    #[test]
    fn prop_lifecycle_counts(count in 1usize..8, watch in any::<bool>()) {
        let declarations: Vec<_> = (0..count)
            .map(|i| {
                TargetDeclaration::new(
                    format!("target-{i}"),
                    ConfigLayer {
                        entry: Some(PathBuf::from(format!("src/{i}.ts"))),
                        outfile: Some(PathBuf::from(format!("dist/{i}.js"))),
                        ..ConfigLayer::default()
                    },
                )
            })
            .collect();
        let flags = BuildFlags::new(false, watch);
        let targets = compose_targets(&ConfigLayer::default(), &declarations, flags).unwrap();

        let bundler = RecordingBundler::new();
        let log = bundler.log();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime
            .block_on(Coordinator::new(Arc::new(bundler), flags).run(targets))
            .unwrap();

        prop_assert_eq!(log.count(CallKind::CreateContext), count);
        if watch {
            prop_assert_eq!(log.count(CallKind::Watch), count);
            prop_assert_eq!(log.count(CallKind::Rebuild), 0);
            prop_assert_eq!(log.count(CallKind::Dispose), 0);
        } else {
            prop_assert_eq!(log.count(CallKind::Watch), 0);
            prop_assert_eq!(log.count(CallKind::Rebuild), count);
            prop_assert_eq!(log.count(CallKind::Dispose), count);

            let mut rebuilt = log.targets(CallKind::Rebuild);
            let mut disposed = log.targets(CallKind::Dispose);
            rebuilt.sort();
            disposed.sort();
            prop_assert_eq!(rebuilt, disposed);
        }
    }
}
