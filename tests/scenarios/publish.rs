//! Test: Build-and-publish runs on a clean working tree

use crate::helpers::*;
use release_pipeline::core::{PipelineStep, StepStatus};
use release_pipeline::execution::ExecutionEvent;
use release_pipeline::{Orchestrator, ReleaseMode};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_publish_runs_every_command_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), publish_flags("1.2.3")).unwrap();
    assert_eq!(config.mode(), ReleaseMode::BuildAndPublish);

    let spy = SpyRunner::new();
    let outcome = run_with_spy(&config, &spy).await;

    assert!(outcome.is_success(), "unexpected failure: {:?}", outcome.error());
    let output_dir = config.output_dir();
    let artifact = config.artifact_path();
    assert_commands(
        &spy,
        &[
            "git status --porcelain",
            "git fetch origin -v",
            "git switch -f main",
            "git reset --hard HEAD",
            "git pull",
            "git clean -d -f",
            &format!(
                "dotnet pack -c Release /p:Version=1.2.3 -o {}",
                output_dir.display()
            ),
            &format!(
                "dotnet nuget push -s https://nuget.theaurum.net/v3/index.json -k *** {} --skip-duplicate",
                artifact.display()
            ),
            "git tag -a v1.2.3 -m v1.2.3\nphis.shared-library.1.2.3.nupkg",
            "git push --tags",
        ],
    );

    assert_eq!(
        outcome.executed_steps(),
        vec![
            PipelineStep::VerifyClean,
            PipelineStep::SyncTrunk,
            PipelineStep::CreatePackage,
            PipelineStep::PublishToRegistry,
            PipelineStep::TagRelease,
        ]
    );
    assert!(outcome
        .records()
        .iter()
        .all(|r| r.status == StepStatus::Completed));
}

#[tokio::test]
async fn test_git_commands_run_in_repo_root() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), publish_flags("0.1.0")).unwrap();

    let spy = SpyRunner::new();
    run_with_spy(&config, &spy).await;

    for spec in spy.calls().iter().filter(|s| s.program == "git") {
        assert_eq!(spec.working_dir(), config.repo_root(), "{}", spec.display());
    }
}

#[tokio::test]
async fn test_registry_push_receives_secret_but_never_displays_it() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), publish_flags("2.2.2")).unwrap();

    let spy = SpyRunner::new();
    run_with_spy(&config, &spy).await;

    let push = spy
        .calls()
        .into_iter()
        .find(|s| s.args.first().map(String::as_str) == Some("nuget"))
        .expect("registry push should run");
    assert!(push.tokens().contains(&"api-key-0001"));
    assert!(push.args.contains(&"--skip-duplicate".to_string()));
    assert!(spy.commands().iter().all(|c| !c.contains("api-key-0001")));
}

#[tokio::test]
async fn test_output_dir_removed_after_publish() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), publish_flags("5.0.0")).unwrap();

    let spy = SpyRunner::new().creating_file("dotnet pack", config.artifact_path());
    let outcome = run_with_spy(&config, &spy).await;

    assert!(outcome.is_success());
    assert!(!config.output_dir().exists());
}

#[tokio::test]
async fn test_events_follow_the_plan() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), publish_flags("1.0.0")).unwrap();

    let events = Arc::new(Mutex::new(Vec::new()));
    let collected = events.clone();
    let mut orchestrator = Orchestrator::new(SpyRunner::new());
    orchestrator.add_event_handler(move |event| collected.lock().unwrap().push(event.clone()));

    orchestrator.run(&config).await;

    let events = events.lock().unwrap();
    let started: Vec<(PipelineStep, usize)> = events
        .iter()
        .filter_map(|e| match e {
            ExecutionEvent::StepStarted { step, position, .. } => Some((*step, *position)),
            _ => None,
        })
        .collect();
    assert_eq!(
        started,
        vec![
            (PipelineStep::VerifyClean, 1),
            (PipelineStep::SyncTrunk, 2),
            (PipelineStep::CreatePackage, 3),
            (PipelineStep::PublishToRegistry, 4),
            (PipelineStep::TagRelease, 5),
        ]
    );
    assert!(matches!(
        events.first(),
        Some(ExecutionEvent::PipelineStarted { total_steps: 5, .. })
    ));
}
