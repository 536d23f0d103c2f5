mod common;

use chrono::Utc;
use process_monitor::domain::models::{DayOfWeek, Process, ProcessDate, ProcessStatus, ProcessTime};
use process_monitor::{DomainError, FilterField, ProcessFilter, ProcessRepository};

use common::{all_repositories, sqlite_repository};

fn windowed(id: &str, process_type: &str) -> Process {
    Process::new(id, process_type, format!("Process {id}"))
        .with_description("nightly batch")
        .with_dates(
            Some("01-01-2025".parse::<ProcessDate>().unwrap()),
            Some("31-12-2025".parse::<ProcessDate>().unwrap()),
        )
        .with_times(
            Some("08:00:00".parse::<ProcessTime>().unwrap()),
            Some("18:30:00".parse::<ProcessTime>().unwrap()),
        )
        .with_day_off(DayOfWeek::Saturday)
        .with_day_off(DayOfWeek::Sunday)
}

async fn seed(repo: &dyn ProcessRepository) {
    for process in [
        windowed("a", "etl").with_status(ProcessStatus::Running),
        windowed("b", "report"),
        Process::new("c", "etl", "Process c").with_status(ProcessStatus::Stopped),
        Process::new("d", "cleanup", "Process d").with_day_off(DayOfWeek::Monday),
    ] {
        repo.create(&process).await.expect("failed to create process");
    }
}

fn ids(processes: &[Process]) -> Vec<&str> {
    processes.iter().map(|p| p.id.as_str()).collect()
}

#[tokio::test]
async fn test_sqlite_round_trip_preserves_every_field() {
    let repo = sqlite_repository().await;
    let process = windowed("p1", "etl").with_status(ProcessStatus::Stopped);

    repo.create(&process).await.unwrap();
    let stored = repo.get("p1").await.unwrap().expect("process should exist");

    assert_eq!(stored, process);
}

#[tokio::test]
async fn test_get_missing_returns_none() {
    for (backend, repo) in all_repositories().await {
        assert!(repo.get("missing").await.unwrap().is_none(), "{backend}");
    }
}

#[tokio::test]
async fn test_duplicate_create_is_a_conflict() {
    for (backend, repo) in all_repositories().await {
        repo.create(&Process::new("p1", "etl", "First")).await.unwrap();

        let err = repo
            .create(&Process::new("p1", "etl", "Second"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, DomainError::ProcessAlreadyExists(ref id) if id == "p1"),
            "{backend}: {err}"
        );
        assert_eq!(repo.get("p1").await.unwrap().unwrap().name, "First", "{backend}");
    }
}

#[tokio::test]
async fn test_backends_agree_on_filters() {
    let cases: Vec<(ProcessFilter, Vec<&str>)> = vec![
        (ProcessFilter::new(), vec!["a", "b", "c", "d"]),
        (ProcessFilter::new().with(FilterField::Type, "etl"), vec!["a", "c"]),
        (
            ProcessFilter::new()
                .with(FilterField::Type, "etl")
                .with(FilterField::Type, "report"),
            vec!["a", "b", "c"],
        ),
        (
            ProcessFilter::new()
                .with(FilterField::Type, "etl")
                .with(FilterField::Status, "running"),
            vec!["a"],
        ),
        (ProcessFilter::new().with(FilterField::DayOff, "sunday"), vec!["a", "b"]),
        (
            ProcessFilter::new()
                .with(FilterField::DayOff, "monday")
                .with(FilterField::DayOff, "saturday"),
            vec!["a", "b", "d"],
        ),
        (ProcessFilter::new().with(FilterField::DateFrom, "01-01-2025"), vec!["a", "b"]),
        (ProcessFilter::new().with(FilterField::TimeTo, "18:30:00"), vec!["a", "b"]),
        (ProcessFilter::new().with(FilterField::Type, "missing"), vec![]),
    ];

    for (backend, repo) in all_repositories().await {
        seed(repo.as_ref()).await;
        for (filter, expected) in &cases {
            let found = repo.list(filter).await.unwrap();
            assert_eq!(ids(&found), *expected, "{backend}: {filter:?}");
        }
    }
}

#[tokio::test]
async fn test_update_replaces_fields_but_not_created_at() {
    for (backend, repo) in all_repositories().await {
        let original = windowed("p1", "etl");
        repo.create(&original).await.unwrap();

        let mut replacement = Process::new("p1", "report", "Renamed");
        replacement.created_at = Utc::now() + chrono::Duration::days(7);
        assert!(repo.update(&replacement).await.unwrap(), "{backend}");

        let stored = repo.get("p1").await.unwrap().unwrap();
        assert_eq!(stored.process_type, "report", "{backend}");
        assert_eq!(stored.name, "Renamed", "{backend}");
        assert!(stored.date_from.is_none(), "{backend}");
        assert!(stored.days_off.is_empty(), "{backend}");
        assert_eq!(stored.created_at, original.created_at, "{backend}");
    }
}

#[tokio::test]
async fn test_writes_against_missing_ids_report_false() {
    for (backend, repo) in all_repositories().await {
        seed(repo.as_ref()).await;

        assert!(!repo.update(&Process::new("zz", "etl", "Ghost")).await.unwrap(), "{backend}");
        assert!(
            !repo.update_status("zz", ProcessStatus::Running, Utc::now()).await.unwrap(),
            "{backend}"
        );
        assert!(!repo.delete("zz").await.unwrap(), "{backend}");
        assert_eq!(repo.list(&ProcessFilter::new()).await.unwrap().len(), 4, "{backend}");
    }
}

#[tokio::test]
async fn test_update_status_touches_only_status() {
    for (backend, repo) in all_repositories().await {
        let process = windowed("p1", "etl");
        repo.create(&process).await.unwrap();

        let at = Utc::now() + chrono::Duration::minutes(5);
        assert!(repo.update_status("p1", ProcessStatus::Running, at).await.unwrap());

        let stored = repo.get("p1").await.unwrap().unwrap();
        assert_eq!(stored.status, Some(ProcessStatus::Running), "{backend}");
        assert_eq!(stored.updated_at, at, "{backend}");
        assert_eq!(stored.name, process.name, "{backend}");
        assert_eq!(stored.days_off, process.days_off, "{backend}");
    }
}

#[tokio::test]
async fn test_delete_all_is_idempotent() {
    for (backend, repo) in all_repositories().await {
        seed(repo.as_ref()).await;

        assert_eq!(repo.delete_all().await.unwrap(), 4, "{backend}");
        assert_eq!(repo.delete_all().await.unwrap(), 0, "{backend}");
        assert!(repo.list(&ProcessFilter::new()).await.unwrap().is_empty(), "{backend}");
    }
}
