//! Behavioural properties of the progress store, decoder and view

use anyhow::Result;
use gitchest_core::app::{
    decode_message, decode_progress, parse_repo_url, render, AutofillError, JobProgressStore,
};
use gitchest_core::domain::{
    Event, JobKey, Platform, TaskCatalog, TaskId, TaskSnapshot, TaskStatus,
};
use gitchest_core::ports::ChannelMessage;
use serde_json::json;

fn octocat() -> JobKey {
    JobKey::new(Platform::GitHub, "octocat", "Hello-World")
}

fn apply(store: &mut JobProgressStore, payload: serde_json::Value) -> Result<()> {
    let event = decode_progress(&payload)?;
    store.upsert(event.key, event.snapshot);
    Ok(())
}

fn statuses(store: &JobProgressStore, key: &JobKey) -> Vec<TaskStatus> {
    TaskCatalog::pipeline().map(|id| store.status_of(key, id)).collect()
}

#[test]
fn test_each_current_task_splits_pipeline_into_three_groups() {
    let key = octocat();
    for (index, current) in TaskCatalog::pipeline().enumerate() {
        let mut store = JobProgressStore::new();
        store.upsert(key.clone(), TaskSnapshot::new(current.clone(), 50));

        let statuses = statuses(&store, &key);
        let completed = statuses.iter().filter(|s| **s == TaskStatus::Completed).count();
        let active = statuses.iter().filter(|s| **s == TaskStatus::Active).count();
        let pending = statuses.iter().filter(|s| **s == TaskStatus::Pending).count();

        assert_eq!(completed, index);
        assert_eq!(active, 1);
        assert_eq!(pending, TaskCatalog::pipeline_length() - index - 1);
        assert_eq!(completed + active + pending, TaskCatalog::pipeline_length());
    }
}

#[test]
fn test_arrival_order_decides_current_task() {
    let key = octocat();
    let mut store = JobProgressStore::new();
    store.upsert(key.clone(), TaskSnapshot::new(TaskId::Readme, 30));
    store.upsert(key.clone(), TaskSnapshot::new(TaskId::FetchTree, 60));

    // A late event for an earlier stage moves the view back
    assert_eq!(store.current_task_id(&key), Some(&TaskId::FetchTree));
    assert_eq!(store.status_of(&key, &TaskId::Metadata), TaskStatus::Completed);
    assert_eq!(store.status_of(&key, &TaskId::FetchTree), TaskStatus::Active);
    assert_eq!(store.status_of(&key, &TaskId::Readme), TaskStatus::Pending);
    assert_eq!(store.display_percentage(&key, &TaskId::Readme), 0);
}

#[test]
fn test_repeated_event_is_idempotent() -> Result<()> {
    let key = octocat();
    let payload = json!({
        "platform": "github", "user": "octocat", "repo": "Hello-World",
        "task_id": "insert_tree", "percentage": 70, "step": 7, "total_steps": 10,
    });

    let mut once = JobProgressStore::new();
    apply(&mut once, payload.clone())?;

    let mut twice = JobProgressStore::new();
    apply(&mut twice, payload.clone())?;
    apply(&mut twice, payload)?;

    assert_eq!(once.all_jobs(), twice.all_jobs());
    assert_eq!(render(&once, &key), render(&twice, &key));
    Ok(())
}

#[test]
fn test_jobs_are_isolated() {
    let a = octocat();
    let b = JobKey::new(Platform::GitHub, "octocat", "Spoon-Knife");
    let mut store = JobProgressStore::new();

    store.upsert(a.clone(), TaskSnapshot::new(TaskId::Owner, 10));
    store.upsert(b.clone(), TaskSnapshot::new(TaskId::Metadata, 90));

    assert_eq!(store.current_task_id(&a), Some(&TaskId::Owner));
    assert_eq!(store.status_of(&a, &TaskId::Metadata), TaskStatus::Completed);
    assert_eq!(store.display_percentage(&b, &TaskId::Metadata), 90);
    assert_eq!(store.keys().cloned().collect::<Vec<_>>(), vec![a, b]);
}

#[test]
fn test_completed_rows_always_show_full_percentage() {
    let key = octocat();
    let mut store = JobProgressStore::new();
    store.upsert(key.clone(), TaskSnapshot::new(TaskId::Metadata, 3));
    store.upsert(key.clone(), TaskSnapshot::new(TaskId::FetchTree, 0).with_steps(0, 4));
    store.upsert(key.clone(), TaskSnapshot::new(TaskId::InsertTree, 12));

    let view = render(&store, &key);
    for row in view.rows.iter().filter(|row| row.status == TaskStatus::Completed) {
        assert_eq!(row.percentage, 100, "{} should read 100%", row.task_id);
    }
    assert_eq!(view.completed_tasks, 2);
}

#[test]
fn test_octocat_scenario_from_first_event() -> Result<()> {
    let key = octocat();
    let mut store = JobProgressStore::new();

    apply(&mut store, json!({
        "platform": "github", "user": "octocat", "repo": "Hello-World",
        "task_id": "metadata", "percentage": 40,
    }))?;
    assert_eq!(store.current_task_id(&key), Some(&TaskId::Metadata));
    assert_eq!(store.display_percentage(&key, &TaskId::Metadata), 40);
    assert_eq!(
        statuses(&store, &key),
        vec![
            TaskStatus::Active,
            TaskStatus::Pending,
            TaskStatus::Pending,
            TaskStatus::Pending,
            TaskStatus::Pending,
        ]
    );

    apply(&mut store, json!({
        "platform": "github", "user": "octocat", "repo": "Hello-World",
        "task_id": "fetch_tree", "percentage": 10, "step": 1, "total_steps": 10,
    }))?;
    let view = render(&store, &key);
    assert_eq!(view.rows[0].status, TaskStatus::Completed);
    assert_eq!(view.rows[0].percentage, 100);
    assert_eq!(view.rows[1].status, TaskStatus::Active);
    assert_eq!(view.rows[1].percentage, 10);
    assert_eq!(view.rows[1].step_label.as_deref(), Some("1/10"));
    assert_eq!(view.rows[1].description, "Fetch tree from GitHub");
    Ok(())
}

#[test]
fn test_identity_less_event_changes_nothing() {
    let key = octocat();
    let mut store = JobProgressStore::new();
    store.upsert(key.clone(), TaskSnapshot::new(TaskId::Metadata, 40));
    let before = store.all_jobs();

    let message = ChannelMessage::Progress(json!({ "platform": "github" }));
    if let Ok(Event::Progress(progress)) = decode_message(&message) {
        store.upsert(progress.key, progress.snapshot);
    }

    assert!(decode_message(&message).is_err());
    assert_eq!(store.all_jobs(), before);
}

#[test]
fn test_unknown_task_does_not_disturb_known_rows() -> Result<()> {
    let key = octocat();
    let mut store = JobProgressStore::new();
    apply(&mut store, json!({
        "platform": "github", "user": "octocat", "repo": "Hello-World",
        "task_id": "insert_tree", "percentage": 55,
    }))?;
    apply(&mut store, json!({
        "platform": "github", "user": "octocat", "repo": "Hello-World",
        "task_id": "license_scan", "percentage": 10,
    }))?;

    assert_eq!(store.current_task_id(&key), Some(&TaskId::Unknown("license_scan".into())));
    assert!(statuses(&store, &key).iter().all(|s| *s == TaskStatus::Pending));
    assert_eq!(render(&store, &key).rows.len(), TaskCatalog::pipeline_length());
    Ok(())
}

#[test]
fn test_url_autofill_cases() -> Result<()> {
    let location = parse_repo_url("https://github.com/octocat/Hello-World.git")?;
    assert_eq!(location.platform, Platform::GitHub);
    assert_eq!(location.user, "octocat");
    assert_eq!(location.repo, "Hello-World");

    let location = parse_repo_url("gitlab.com/gitlab-org/gitlab/-/tree/master")?;
    assert_eq!(location.platform, Platform::GitLab);
    assert_eq!(location.repo, "gitlab");

    assert_eq!(
        parse_repo_url("http://github.com/octocat/Hello-World").unwrap_err(),
        AutofillError::UnsupportedProtocol
    );
    assert_eq!(
        parse_repo_url("https://example.com/octocat/Hello-World").unwrap_err(),
        AutofillError::UnsupportedPlatform
    );
    assert_eq!(parse_repo_url("https://github.com/").unwrap_err(), AutofillError::MissingUser);
    assert_eq!(
        parse_repo_url("https://github.com/octocat").unwrap_err(),
        AutofillError::MissingRepo
    );
    Ok(())
}
