mod common;

use std::sync::Arc;

use process_monitor::domain::models::{ProcessStatus, ViolationKind};
use process_monitor::{
    DomainError, FilterField, InMemoryProcessRepository, ProcessFilter, ProcessRequest,
    ProcessService,
};

use common::{all_repositories, at, monday_noon, request, service_over, setup_test_logging};

#[tokio::test]
async fn test_create_then_get_round_trips() {
    setup_test_logging();
    for (backend, repo) in all_repositories().await {
        let service = service_over(repo);
        let created = service
            .create_process(ProcessRequest {
                description: Some("loads the warehouse".to_string()),
                date_from: Some("01-01-2025".to_string()),
                time_to: Some("23:00:00".to_string()),
                days_off: vec!["Sunday".to_string()],
                status: Some("stopped".to_string()),
                ..request("p1", "etl")
            })
            .await
            .unwrap();

        let fetched = service.get_process("p1").await.unwrap();
        assert_eq!(fetched, created, "{backend}");
        assert_eq!(ProcessRequest::from(&fetched).days_off, vec!["sunday"], "{backend}");
    }
}

#[tokio::test]
async fn test_list_by_type() {
    for (backend, repo) in all_repositories().await {
        let service = service_over(repo);
        for (id, process_type) in [("a", "X"), ("b", "Y"), ("c", "X")] {
            service.create_process(request(id, process_type)).await.unwrap();
        }

        let all = service.list_processes(&ProcessFilter::new()).await.unwrap();
        assert_eq!(all.len(), 3, "{backend}");

        let only_x = service
            .list_processes(&ProcessFilter::new().with(FilterField::Type, "X"))
            .await
            .unwrap();
        assert!(only_x.iter().all(|p| p.process_type == "X"), "{backend}");
        assert_eq!(only_x.len(), 2, "{backend}");
    }
}

#[test]
fn test_unknown_filter_field_is_rejected() {
    let err = ProcessFilter::from_pairs(["type=X", "colour=red"]).unwrap_err();
    match err {
        DomainError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "colour");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_all_twice_leaves_nothing() {
    for (backend, repo) in all_repositories().await {
        let service = service_over(repo);
        service.create_process(request("a", "etl")).await.unwrap();
        service.create_process(request("b", "etl")).await.unwrap();

        assert_eq!(service.delete_all_processes().await.unwrap(), 2, "{backend}");
        assert_eq!(service.delete_all_processes().await.unwrap(), 0, "{backend}");
        assert!(service
            .list_processes(&ProcessFilter::new())
            .await
            .unwrap()
            .is_empty());
    }
}

#[tokio::test]
async fn test_future_start_date_is_too_early() {
    let service = ProcessService::new(Arc::new(InMemoryProcessRepository::new()));
    service
        .create_process(ProcessRequest {
            date_from: Some("01-01-2030".to_string()),
            ..request("p1", "etl")
        })
        .await
        .unwrap();

    let eligibility = service
        .check_status_change("p1", ProcessStatus::Running, at(2025, 1, 1, 9, 0))
        .await
        .unwrap();
    assert_eq!(eligibility.kinds(), vec![ViolationKind::TooEarlyDate]);
}

#[tokio::test]
async fn test_day_off_blocks_start() {
    let service = ProcessService::new(Arc::new(InMemoryProcessRepository::new()));
    service
        .create_process(ProcessRequest {
            days_off: vec!["monday".to_string()],
            ..request("p1", "etl")
        })
        .await
        .unwrap();

    let err = service
        .request_status_change("p1", ProcessStatus::Running, monday_noon())
        .await
        .unwrap_err();
    match err {
        DomainError::Ineligible { id, violations } => {
            assert_eq!(id, "p1");
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].kind, ViolationKind::ExcludedDay);
        }
        other => panic!("expected Ineligible, got {other:?}"),
    }
    assert_eq!(service.get_process("p1").await.unwrap().status, None);
}

#[tokio::test]
async fn test_start_inside_window_then_restart_is_blocked() {
    for (backend, repo) in all_repositories().await {
        let service = service_over(repo);
        service
            .create_process(ProcessRequest {
                date_from: Some("01-01-2025".to_string()),
                date_to: Some("31-12-2025".to_string()),
                time_from: Some("09:00:00".to_string()),
                time_to: Some("17:00:00".to_string()),
                days_off: vec!["saturday".to_string(), "sunday".to_string()],
                ..request("p1", "etl")
            })
            .await
            .unwrap();

        let started = service
            .request_status_change("p1", ProcessStatus::Running, monday_noon())
            .await
            .unwrap();
        assert_eq!(started.status, Some(ProcessStatus::Running), "{backend}");
        assert_eq!(
            service.get_process("p1").await.unwrap().status,
            Some(ProcessStatus::Running),
            "{backend}"
        );

        let err = service
            .request_status_change("p1", ProcessStatus::Running, monday_noon())
            .await
            .unwrap_err();
        assert!(
            matches!(err, DomainError::Ineligible { ref violations, .. }
                if violations[0].kind == ViolationKind::AlreadyRunning),
            "{backend}: {err}"
        );
    }
}

#[tokio::test]
async fn test_update_missing_leaves_storage_unchanged() {
    for (backend, repo) in all_repositories().await {
        let service = service_over(repo);
        service.create_process(request("a", "etl")).await.unwrap();

        let err = service
            .update_process("missing", request("missing", "etl"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ProcessNotFound(ref id) if id == "missing"), "{backend}");

        let all = service.list_processes(&ProcessFilter::new()).await.unwrap();
        assert_eq!(all.len(), 1, "{backend}");
        assert_eq!(all[0].id, "a", "{backend}");
    }
}

#[tokio::test]
async fn test_empty_name_is_a_validation_error() {
    let repo = Arc::new(InMemoryProcessRepository::new());
    let service = ProcessService::new(repo.clone());

    let err = service
        .create_process(ProcessRequest {
            name: String::new(),
            ..request("p1", "etl")
        })
        .await
        .unwrap_err();

    match err {
        DomainError::Validation(errors) => {
            assert!(errors.iter().any(|e| e.field == "name"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_validation_reports_every_bad_field() {
    let service = ProcessService::new(Arc::new(InMemoryProcessRepository::new()));

    let err = service
        .create_process(ProcessRequest {
            date_from: Some("2025-01-01".to_string()),
            time_to: Some("25:00:00".to_string()),
            days_off: vec!["funday".to_string()],
            status: Some("paused".to_string()),
            ..request("p1", "etl")
        })
        .await
        .unwrap_err();

    let DomainError::Validation(errors) = err else {
        panic!("expected Validation");
    };
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    for expected in ["date_from", "time_to", "status", "days_off"] {
        assert!(fields.contains(&expected), "missing {expected} in {fields:?}");
    }
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    for (backend, repo) in all_repositories().await {
        let service = service_over(repo);
        service.create_process(request("p1", "etl")).await.unwrap();

        service.delete_process("p1").await.unwrap();
        assert_eq!(
            service.get_process("p1").await.unwrap_err().category(),
            "not_found",
            "{backend}"
        );
        assert_eq!(
            service.delete_process("p1").await.unwrap_err().category(),
            "not_found",
            "{backend}"
        );
    }
}

#[tokio::test]
async fn test_update_cannot_start_an_ineligible_process() {
    for (backend, repo) in all_repositories().await {
        let service = service_over(repo);
        let window = ProcessRequest {
            date_to: Some("01-01-2020".to_string()),
            days_off: vec!["monday".to_string()],
            ..request("p1", "etl")
        };
        service.create_process(window.clone()).await.unwrap();

        let err = service
            .request_status_change("p1", ProcessStatus::Running, monday_noon())
            .await
            .unwrap_err();
        assert_eq!(err.category(), "ineligible", "{backend}");

        let err = service
            .update_process(
                "p1",
                ProcessRequest {
                    status: Some("running".to_string()),
                    ..window.clone()
                },
            )
            .await
            .unwrap_err();
        match err {
            DomainError::Validation(errors) => assert_eq!(errors[0].field, "status", "{backend}"),
            other => panic!("{backend}: expected Validation, got {other:?}"),
        }
        assert_eq!(service.get_process("p1").await.unwrap().status, None, "{backend}");

        let err = service
            .create_process(ProcessRequest {
                status: Some("running".to_string()),
                ..request("p2", "etl")
            })
            .await
            .unwrap_err();
        assert_eq!(err.category(), "validation", "{backend}");
        assert!(service.get_process("p2").await.is_err(), "{backend}");
    }
}

#[tokio::test]
async fn test_update_keeps_status_set_by_status_change() {
    for (backend, repo) in all_repositories().await {
        let service = service_over(repo);
        service.create_process(request("p1", "etl")).await.unwrap();
        service
            .request_status_change("p1", ProcessStatus::Running, monday_noon())
            .await
            .unwrap();

        let updated = service
            .update_process(
                "p1",
                ProcessRequest {
                    name: "Renamed".to_string(),
                    ..request("p1", "etl")
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, Some(ProcessStatus::Running), "{backend}");

        let stored = service.get_process("p1").await.unwrap();
        assert_eq!(stored.name, "Renamed", "{backend}");
        assert_eq!(stored.status, Some(ProcessStatus::Running), "{backend}");
    }
}
