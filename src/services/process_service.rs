//! Service for managing processes and their run status.
//!
//! Validates requests, consults the eligibility engine before a process is
//! started, and delegates storage to a ProcessRepository.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use tracing::{error, info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::eligibility::Eligibility;
use crate::domain::models::process::{Process, ProcessStatus};
use crate::domain::models::process_request::{FieldError, ProcessRequest};
use crate::domain::ports::process_repository::{ProcessFilter, ProcessRepository};
use crate::services::eligibility_engine::can_execute;

/// Log a failed repository call at a level matching its category.
fn log_failure(operation: &'static str, id: &str, err: &DomainError) {
    match err {
        DomainError::Persistence(_) => error!(operation, id, error = %err, "process operation failed"),
        _ => warn!(operation, id, error = %err, "process operation rejected"),
    }
}

fn requests_running(request: &ProcessRequest) -> bool {
    request
        .status
        .as_deref()
        .and_then(|s| s.parse::<ProcessStatus>().ok())
        .is_some_and(|s| s.is_start())
}

fn status_change_required() -> FieldError {
    FieldError::new("status", "can only be changed through a status change request")
}

pub struct ProcessService<R: ProcessRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ProcessRepository + ?Sized> ProcessService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    async fn load(&self, operation: &'static str, id: &str) -> DomainResult<Process> {
        match self.repository.get(id).await {
            Ok(Some(process)) => Ok(process),
            Ok(None) => {
                let err = DomainError::ProcessNotFound(id.to_string());
                log_failure(operation, id, &err);
                Err(err)
            }
            Err(err) => {
                log_failure(operation, id, &err);
                Err(err)
            }
        }
    }

    /// Get a process by id.
    pub async fn get_process(&self, id: &str) -> DomainResult<Process> {
        let process = self.load("get", id).await?;
        info!(operation = "get", id, "process loaded");
        Ok(process)
    }

    /// List processes matching `filter`, ordered by id.
    pub async fn list_processes(&self, filter: &ProcessFilter) -> DomainResult<Vec<Process>> {
        let processes = self.repository.list(filter).await.inspect_err(|err| {
            log_failure("list", "*", err);
        })?;
        info!(operation = "list", count = processes.len(), "processes listed");
        Ok(processes)
    }

    /// Validate and store a new process.
    ///
    /// A process may be created stopped or without a status, never running;
    /// starting it goes through `request_status_change`.
    pub async fn create_process(&self, request: ProcessRequest) -> DomainResult<Process> {
        let id = request.id.trim().to_string();
        let starts_running = requests_running(&request);
        let process = match request.into_process(None, Utc::now()) {
            Ok(process) if !starts_running => Ok(process),
            Ok(_) => Err(vec![status_change_required()]),
            Err(mut errors) => {
                if starts_running {
                    errors.push(status_change_required());
                }
                Err(errors)
            }
        }
        .map_err(DomainError::Validation)
        .inspect_err(|err| log_failure("create", &id, err))?;

        self.repository
            .create(&process)
            .await
            .inspect_err(|err| log_failure("create", &process.id, err))?;

        info!(operation = "create", id = %process.id, "process created");
        Ok(process)
    }

    /// Replace every mutable field of an existing process except its status.
    ///
    /// The id comes from `id`; whatever id the request carries is ignored.
    /// The request may omit the status or repeat the stored one; a different
    /// status is rejected, since status moves only through
    /// `request_status_change`.
    pub async fn update_process(&self, id: &str, request: ProcessRequest) -> DomainResult<Process> {
        let request = ProcessRequest {
            id: id.to_string(),
            ..request
        };
        // Validation runs before any storage call.
        let draft = request
            .into_process(None, Utc::now())
            .map_err(DomainError::Validation)
            .inspect_err(|err| log_failure("update", id, err))?;

        let existing = self.load("update", id).await?;
        if draft.status.is_some() && draft.status != existing.status {
            let err = DomainError::Validation(vec![status_change_required()]);
            log_failure("update", id, &err);
            return Err(err);
        }

        let process = Process {
            status: existing.status,
            created_at: existing.created_at,
            ..draft
        };

        let updated = self
            .repository
            .update(&process)
            .await
            .inspect_err(|err| log_failure("update", id, err))?;
        if !updated {
            let err = DomainError::ProcessNotFound(id.to_string());
            log_failure("update", id, &err);
            return Err(err);
        }

        info!(operation = "update", id, "process updated");
        Ok(process)
    }

    /// Move a process to `target`.
    ///
    /// Starting a process requires it to be eligible at `now`; an ineligible
    /// request fails with every violation and nothing is written. Stopping is
    /// always allowed. The read and the write are separate calls, so a
    /// concurrent change between them is not detected.
    pub async fn request_status_change(
        &self,
        id: &str,
        target: ProcessStatus,
        now: NaiveDateTime,
    ) -> DomainResult<Process> {
        let mut process = self.load("status", id).await?;

        if target.is_start() {
            let eligibility = can_execute(&process, now);
            if !eligibility.is_eligible() {
                let err = DomainError::Ineligible {
                    id: id.to_string(),
                    violations: eligibility.violations,
                };
                log_failure("status", id, &err);
                return Err(err);
            }
        }

        let updated_at = Utc::now();
        let written = self
            .repository
            .update_status(id, target, updated_at)
            .await
            .inspect_err(|err| log_failure("status", id, err))?;
        if !written {
            let err = DomainError::ProcessNotFound(id.to_string());
            log_failure("status", id, &err);
            return Err(err);
        }

        process.status = Some(target);
        process.updated_at = updated_at;
        info!(operation = "status", id, status = %target, "process status changed");
        Ok(process)
    }

    /// Report whether `request_status_change` would succeed, without writing.
    pub async fn check_status_change(
        &self,
        id: &str,
        target: ProcessStatus,
        now: NaiveDateTime,
    ) -> DomainResult<Eligibility> {
        let process = self.load("check", id).await?;
        let eligibility = if target.is_start() {
            can_execute(&process, now)
        } else {
            Eligibility::eligible()
        };
        info!(
            operation = "check",
            id,
            status = %target,
            eligible = eligibility.is_eligible(),
            "status change evaluated"
        );
        Ok(eligibility)
    }

    /// Delete a process.
    pub async fn delete_process(&self, id: &str) -> DomainResult<()> {
        let deleted = self
            .repository
            .delete(id)
            .await
            .inspect_err(|err| log_failure("delete", id, err))?;
        if !deleted {
            let err = DomainError::ProcessNotFound(id.to_string());
            log_failure("delete", id, &err);
            return Err(err);
        }
        info!(operation = "delete", id, "process deleted");
        Ok(())
    }

    /// Delete every process, returning how many were removed.
    pub async fn delete_all_processes(&self) -> DomainResult<u64> {
        let removed = self
            .repository
            .delete_all()
            .await
            .inspect_err(|err| log_failure("delete_all", "*", err))?;
        info!(operation = "delete_all", removed, "processes deleted");
        Ok(removed)
    }
}
