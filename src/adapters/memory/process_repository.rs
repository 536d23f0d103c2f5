//! In-memory adapter for ProcessRepository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::process::{Process, ProcessStatus};
use crate::domain::ports::process_repository::{ProcessFilter, ProcessRepository};

/// Process store backed by an ordered map keyed by id.
#[derive(Default)]
pub struct InMemoryProcessRepository {
    processes: RwLock<BTreeMap<String, Process>>,
}

impl InMemoryProcessRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored processes.
    pub async fn len(&self) -> usize {
        self.processes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.processes.read().await.is_empty()
    }
}

#[async_trait]
impl ProcessRepository for InMemoryProcessRepository {
    async fn get(&self, id: &str) -> DomainResult<Option<Process>> {
        Ok(self.processes.read().await.get(id).cloned())
    }

    async fn list(&self, filter: &ProcessFilter) -> DomainResult<Vec<Process>> {
        Ok(self
            .processes
            .read()
            .await
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn create(&self, process: &Process) -> DomainResult<()> {
        let mut processes = self.processes.write().await;
        if processes.contains_key(&process.id) {
            return Err(DomainError::ProcessAlreadyExists(process.id.clone()));
        }
        processes.insert(process.id.clone(), process.clone());
        Ok(())
    }

    async fn update(&self, process: &Process) -> DomainResult<bool> {
        let mut processes = self.processes.write().await;
        let Some(existing) = processes.get_mut(&process.id) else {
            return Ok(false);
        };
        let created_at = existing.created_at;
        *existing = Process {
            created_at,
            ..process.clone()
        };
        Ok(true)
    }

    async fn update_status(
        &self,
        id: &str,
        status: ProcessStatus,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let mut processes = self.processes.write().await;
        let Some(existing) = processes.get_mut(id) else {
            return Ok(false);
        };
        existing.status = Some(status);
        existing.updated_at = updated_at;
        Ok(true)
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        Ok(self.processes.write().await.remove(id).is_some())
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let mut processes = self.processes.write().await;
        let removed = processes.len() as u64;
        processes.clear();
        Ok(removed)
    }
}
