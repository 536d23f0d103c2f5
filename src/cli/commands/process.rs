//! Process CLI commands.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Subcommand};
use comfy_table::{Attribute, Cell, Color};
use serde::Serialize;

use crate::adapters::memory::InMemoryProcessRepository;
use crate::adapters::sqlite::{initialize_from_config, SqliteProcessRepository};
use crate::cli::output::{base_table, output, truncate, CommandOutput};
use crate::domain::models::{
    Config, Eligibility, Process, ProcessRequest, ProcessStatus, StorageBackend, Violation,
};
use crate::domain::ports::{ProcessFilter, ProcessRepository};
use crate::services::process_service::ProcessService;

#[derive(Args, Debug)]
pub struct ProcessArgs {
    #[command(subcommand)]
    pub command: ProcessCommands,
}

/// Every mutable field of a process.
#[derive(Args, Debug, Clone)]
pub struct ProcessFields {
    /// Process type
    #[arg(long = "type")]
    pub process_type: String,

    /// Human-readable name
    #[arg(long)]
    pub name: String,

    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,

    /// First day the process may run (DD-MM-YYYY)
    #[arg(long)]
    pub date_from: Option<String>,

    /// Last day the process may run (DD-MM-YYYY)
    #[arg(long)]
    pub date_to: Option<String>,

    /// Earliest time of day the process may start (HH:MM:SS)
    #[arg(long)]
    pub time_from: Option<String>,

    /// Latest time of day the process may start (HH:MM:SS)
    #[arg(long)]
    pub time_to: Option<String>,

    /// Weekday on which the process must not run (repeatable or comma-separated)
    #[arg(long = "day-off", value_delimiter = ',')]
    pub days_off: Vec<String>,

    /// Status (stopped); a process is started with `process status`
    #[arg(long)]
    pub status: Option<String>,
}

impl ProcessFields {
    fn into_request(self, id: String) -> ProcessRequest {
        ProcessRequest {
            id,
            process_type: self.process_type,
            name: self.name,
            description: self.description,
            date_from: self.date_from,
            date_to: self.date_to,
            time_from: self.time_from,
            time_to: self.time_to,
            days_off: self.days_off,
            status: self.status,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ProcessCommands {
    /// Register a new process
    Create {
        /// Unique process id
        #[arg(long)]
        id: String,

        #[command(flatten)]
        fields: ProcessFields,
    },

    /// Show a process
    Get {
        /// Process id
        id: String,
    },

    /// List processes
    List {
        /// Restrict results, as field=value (repeatable; same field means any of)
        #[arg(short, long = "filter")]
        filters: Vec<String>,
    },

    /// Replace every field of a process
    Update {
        /// Process id
        id: String,

        #[command(flatten)]
        fields: ProcessFields,
    },

    /// Start or stop a process
    Status {
        /// Process id
        id: String,

        /// Target status
        target: ProcessStatus,

        /// Only report whether the change is allowed right now
        #[arg(long)]
        check: bool,
    },

    /// Delete a process
    Delete {
        /// Process id
        id: String,
    },

    /// Delete every process
    DeleteAll,
}

// -- Output structs --

#[derive(Debug, Serialize)]
pub struct ProcessOutput {
    pub id: String,
    #[serde(rename = "type")]
    pub process_type: String,
    pub name: String,
    pub description: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub time_from: Option<String>,
    pub time_to: Option<String>,
    pub days_off: Vec<String>,
    pub status: Option<String>,
    pub window: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Process> for ProcessOutput {
    fn from(p: &Process) -> Self {
        Self {
            id: p.id.clone(),
            process_type: p.process_type.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            date_from: p.date_from.map(String::from),
            date_to: p.date_to.map(String::from),
            time_from: p.time_from.map(String::from),
            time_to: p.time_to.map(String::from),
            days_off: p.days_off.iter().map(|d| d.as_str().to_string()).collect(),
            status: p.status.map(|s| s.as_str().to_string()),
            window: p.window_description(),
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

impl CommandOutput for ProcessOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Process: {}", self.name),
            format!("ID: {}", self.id),
            format!("Type: {}", self.process_type),
        ];

        if let Some(ref description) = self.description {
            lines.push(format!("Description: {}", truncate(description, 80)));
        }

        lines.push(format!("Status: {}", self.status.as_deref().unwrap_or("never started")));
        lines.push(format!("Window: {}", self.window));
        lines.push(format!("Created: {}", self.created_at));
        lines.push(format!("Updated: {}", self.updated_at));

        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct ProcessListOutput {
    pub processes: Vec<ProcessOutput>,
    pub total: usize,
}

impl CommandOutput for ProcessListOutput {
    fn to_human(&self) -> String {
        if self.processes.is_empty() {
            return "No processes found.".to_string();
        }

        let mut table = base_table();
        table.set_header(
            ["ID", "Type", "Name", "Status", "Window"]
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

        for p in &self.processes {
            let status = p.status.as_deref().unwrap_or("-");
            let status_cell = match status {
                "running" => Cell::new(status).fg(Color::Green),
                "stopped" => Cell::new(status).fg(Color::Yellow),
                _ => Cell::new(status).fg(Color::DarkGrey),
            };
            table.add_row(vec![
                Cell::new(&p.id),
                Cell::new(&p.process_type),
                Cell::new(truncate(&p.name, 30)),
                status_cell,
                Cell::new(truncate(&p.window, 50)),
            ]);
        }

        format!("Found {} process(es):\n{table}", self.total)
    }
}

#[derive(Debug, Serialize)]
pub struct EligibilityOutput {
    pub id: String,
    pub target: ProcessStatus,
    pub eligible: bool,
    pub violations: Vec<Violation>,
}

impl EligibilityOutput {
    fn new(id: String, target: ProcessStatus, eligibility: Eligibility) -> Self {
        Self {
            id,
            target,
            eligible: eligibility.is_eligible(),
            violations: eligibility.violations,
        }
    }
}

impl CommandOutput for EligibilityOutput {
    fn to_human(&self) -> String {
        if self.eligible {
            return format!("Process {} can be set to {} now.", self.id, self.target);
        }

        let mut lines = vec![format!(
            "Process {} cannot be set to {} now:",
            self.id, self.target
        )];
        lines.extend(self.violations.iter().map(|v| format!("  - {v}")));
        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct ProcessActionOutput {
    pub success: bool,
    pub message: String,
}

impl CommandOutput for ProcessActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

// -- Execute --

/// Open the storage backend selected in `config`.
pub async fn open_repository(config: &Config) -> Result<Arc<dyn ProcessRepository>> {
    match config.storage.backend {
        StorageBackend::Sqlite => {
            let pool = initialize_from_config(&config.database)
                .await
                .with_context(|| format!("Failed to open database at {}", config.database.path))?;
            Ok(Arc::new(SqliteProcessRepository::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("memory storage backend selected; changes will not persist");
            Ok(Arc::new(InMemoryProcessRepository::new()))
        }
    }
}

pub async fn execute(args: ProcessArgs, config: &Config, json_mode: bool) -> Result<()> {
    let repository = open_repository(config).await?;
    let service = ProcessService::new(repository);

    match args.command {
        ProcessCommands::Create { id, fields } => {
            let process = service.create_process(fields.into_request(id)).await?;
            output(&ProcessOutput::from(&process), json_mode);
        }

        ProcessCommands::Get { id } => {
            let process = service.get_process(&id).await?;
            output(&ProcessOutput::from(&process), json_mode);
        }

        ProcessCommands::List { filters } => {
            let filter = ProcessFilter::from_pairs(&filters)?;
            let processes = service.list_processes(&filter).await?;

            let out = ProcessListOutput {
                total: processes.len(),
                processes: processes.iter().map(ProcessOutput::from).collect(),
            };
            output(&out, json_mode);
        }

        ProcessCommands::Update { id, fields } => {
            let process = service.update_process(&id, fields.into_request(id.clone())).await?;
            output(&ProcessOutput::from(&process), json_mode);
        }

        ProcessCommands::Status { id, target, check } => {
            let now = Local::now().naive_local();
            if check {
                let eligibility = service.check_status_change(&id, target, now).await?;
                output(&EligibilityOutput::new(id, target, eligibility), json_mode);
            } else {
                let process = service.request_status_change(&id, target, now).await?;
                output(&ProcessOutput::from(&process), json_mode);
            }
        }

        ProcessCommands::Delete { id } => {
            service.delete_process(&id).await?;

            let out = ProcessActionOutput {
                success: true,
                message: format!("Process deleted: {id}"),
            };
            output(&out, json_mode);
        }

        ProcessCommands::DeleteAll => {
            let removed = service.delete_all_processes().await?;

            let out = ProcessActionOutput {
                success: true,
                message: format!("Deleted {removed} process(es)"),
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
