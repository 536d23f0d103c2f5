//! SQLite adapter for ProcessRepository.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::adapters::sqlite::{parse_datetime, parse_optional};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::process::{DayOfWeek, Process, ProcessStatus};
use crate::domain::ports::process_repository::{FilterField, ProcessFilter, ProcessRepository};

#[derive(Clone)]
pub struct SqliteProcessRepository {
    pool: SqlitePool,
}

impl SqliteProcessRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProcessRow {
    id: String,
    process_type: String,
    name: String,
    description: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
    time_from: Option<String>,
    time_to: Option<String>,
    days_off: String,
    status: Option<String>,
    created_at: String,
    updated_at: String,
}

fn row_to_process(row: ProcessRow) -> DomainResult<Process> {
    let days_off: BTreeSet<DayOfWeek> = serde_json::from_str(&row.days_off)
        .map_err(|e| DomainError::Persistence(format!("days_off: {e}")))?;

    Ok(Process {
        id: row.id,
        process_type: row.process_type,
        name: row.name,
        description: row.description,
        date_from: parse_optional("date_from", row.date_from)?,
        date_to: parse_optional("date_to", row.date_to)?,
        time_from: parse_optional("time_from", row.time_from)?,
        time_to: parse_optional("time_to", row.time_to)?,
        days_off,
        status: parse_optional("status", row.status)?,
        created_at: parse_datetime(&row.created_at)?,
        updated_at: parse_datetime(&row.updated_at)?,
    })
}

/// Column holding a scalar filter field; `None` for `day_off`, which lives in
/// the JSON `days_off` array.
const fn column(field: FilterField) -> Option<&'static str> {
    match field {
        FilterField::Id => Some("id"),
        FilterField::Type => Some("process_type"),
        FilterField::Name => Some("name"),
        FilterField::Description => Some("description"),
        FilterField::DateFrom => Some("date_from"),
        FilterField::DateTo => Some("date_to"),
        FilterField::TimeFrom => Some("time_from"),
        FilterField::TimeTo => Some("time_to"),
        FilterField::Status => Some("status"),
        FilterField::DayOff => None,
    }
}

fn build_list_query(filter: &ProcessFilter) -> QueryBuilder<'_, Sqlite> {
    let mut qb = QueryBuilder::new("SELECT * FROM processes");

    for (i, (field, values)) in filter.predicates().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        match column(field) {
            Some(col) => {
                qb.push(col).push(" IN (");
            }
            None => {
                qb.push("EXISTS (SELECT 1 FROM json_each(processes.days_off) WHERE json_each.value IN (");
            }
        }

        let mut separated = qb.separated(", ");
        for value in values {
            separated.push_bind(value.as_str());
        }
        separated.push_unseparated(")");

        if column(field).is_none() {
            qb.push(")");
        }
    }

    qb.push(" ORDER BY id");
    qb
}

#[async_trait]
impl ProcessRepository for SqliteProcessRepository {
    async fn get(&self, id: &str) -> DomainResult<Option<Process>> {
        let row: Option<ProcessRow> = sqlx::query_as("SELECT * FROM processes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_process).transpose()
    }

    async fn list(&self, filter: &ProcessFilter) -> DomainResult<Vec<Process>> {
        let mut query = build_list_query(filter);
        let rows: Vec<ProcessRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(row_to_process).collect()
    }

    async fn create(&self, process: &Process) -> DomainResult<()> {
        let days_off = serde_json::to_string(&process.days_off)?;

        sqlx::query(
            "INSERT INTO processes
             (id, process_type, name, description, date_from, date_to,
              time_from, time_to, days_off, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        )
        .bind(&process.id)
        .bind(&process.process_type)
        .bind(&process.name)
        .bind(&process.description)
        .bind(process.date_from.map(String::from))
        .bind(process.date_to.map(String::from))
        .bind(process.time_from.map(String::from))
        .bind(process.time_to.map(String::from))
        .bind(&days_off)
        .bind(process.status.map(|s| s.as_str()))
        .bind(process.created_at.to_rfc3339())
        .bind(process.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db)
                if db.is_unique_violation() || db.message().contains("UNIQUE constraint failed") =>
            {
                DomainError::ProcessAlreadyExists(process.id.clone())
            }
            other => other.into(),
        })?;

        Ok(())
    }

    async fn update(&self, process: &Process) -> DomainResult<bool> {
        let days_off = serde_json::to_string(&process.days_off)?;

        let result = sqlx::query(
            "UPDATE processes SET
             process_type = ?2, name = ?3, description = ?4,
             date_from = ?5, date_to = ?6, time_from = ?7, time_to = ?8,
             days_off = ?9, status = ?10, updated_at = ?11
             WHERE id = ?1"
        )
        .bind(&process.id)
        .bind(&process.process_type)
        .bind(&process.name)
        .bind(&process.description)
        .bind(process.date_from.map(String::from))
        .bind(process.date_to.map(String::from))
        .bind(process.time_from.map(String::from))
        .bind(process.time_to.map(String::from))
        .bind(&days_off)
        .bind(process.status.map(|s| s.as_str()))
        .bind(process.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_status(
        &self,
        id: &str,
        status: ProcessStatus,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let result = sqlx::query("UPDATE processes SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(updated_at.to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM processes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM processes")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
