//! Test: Configuration errors are raised before any command runs

use crate::helpers::*;
use release_pipeline::cli::Cli;
use release_pipeline::core::{ReleaseConfig, ReleaseFlags, ReleaseSettings};
use release_pipeline::ReleaseError;

/// Parse a command line and resolve it; the spy must stay untouched on error
async fn resolve_and_run(args: &[&str], spy: &SpyRunner) -> Result<(), ReleaseError> {
    let dir = tempfile::tempdir().unwrap();
    let cli = Cli::try_parse_from(args.iter().copied())?;
    let config = config_in(dir.path(), cli.flags())?;
    run_with_spy(&config, spy).await.into_result()
}

#[tokio::test]
async fn test_push_without_version_or_secret_spawns_nothing() {
    let spy = SpyRunner::new();
    let err = resolve_and_run(&["release", "-PUSH"], &spy)
        .await
        .unwrap_err();

    assert!(matches!(err, ReleaseError::Configuration(_)));
    assert!(err.to_string().contains("-BUILD_VERSION"));
    assert!(err.to_string().contains("-NUGET_PASSWORD"));
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_push_without_secret_from_command_line() {
    let spy = SpyRunner::new();
    let err = ReleaseConfig::resolve(
        ReleaseFlags {
            push: true,
            build_version: Some("1.2.3".to_string()),
            nuget_password: None,
        },
        ReleaseSettings::default(),
        "/repo",
    )
    .unwrap_err();

    assert!(err.to_string().contains("-NUGET_PASSWORD"));
    assert!(!err.to_string().contains("-BUILD_VERSION"));
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_duplicate_push_flag_spawns_nothing() {
    let spy = SpyRunner::new();
    let err = resolve_and_run(
        &[
            "release",
            "-PUSH",
            "-BUILD_VERSION",
            "1.2.3",
            "-NUGET_PASSWORD",
            "k",
            "-PUSH",
        ],
        &spy,
    )
    .await
    .unwrap_err();

    assert!(err.is_configuration());
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_version_spawns_nothing() {
    for version in ["1.2", "abc", "1.2.3.4", "1000.0.0"] {
        let spy = SpyRunner::new();
        let err = resolve_and_run(&["release", "-BUILD_VERSION", version], &spy)
            .await
            .unwrap_err();
        assert!(err.is_configuration(), "{} should be rejected", version);
        assert!(spy.calls().is_empty());
    }
}

#[tokio::test]
async fn test_valid_versions_are_accepted() {
    for version in ["1.2.3", "123.0.5"] {
        let spy = SpyRunner::new();
        resolve_and_run(&["release", "-build_version", version], &spy)
            .await
            .unwrap();
        assert_eq!(spy.calls().len(), 1);
    }
}

#[tokio::test]
async fn test_empty_secret_is_rejected() {
    let spy = SpyRunner::new();
    let err = resolve_and_run(
        &["release", "-PUSH", "-BUILD_VERSION", "1.2.3", "-NUGET_PASSWORD", ""],
        &spy,
    )
    .await
    .unwrap_err();
    assert!(err.is_configuration());
    assert!(spy.calls().is_empty());
}

#[test]
fn test_settings_file_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("release.yaml");
    std::fs::write(
        &path,
        "package_id: contoso.logging\nregistry_url: https://packages.example.net/v3/index.json\n",
    )
    .unwrap();

    let settings = ReleaseSettings::from_file(&path).unwrap();
    assert_eq!(settings.package_id, "contoso.logging");

    let config = ReleaseConfig::resolve(publish_flags("3.0.0"), settings, dir.path()).unwrap();
    assert_eq!(config.artifact_file_name(), "contoso.logging.3.0.0.nupkg");
}

#[test]
fn test_missing_settings_file_is_settings_error() {
    let err = ReleaseSettings::from_file("/no/such/release.yaml").unwrap_err();
    assert!(matches!(err, ReleaseError::Settings { .. }));
    assert!(err.is_configuration());
}
