//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands::{config::ConfigArgs, process::ProcessArgs};

#[derive(Parser, Debug)]
#[command(name = "process-monitor")]
#[command(about = "Track process execution windows and decide when they may run", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Extra configuration file, merged over the project files
    #[arg(short, long, global = true, env = "PROCMON_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage processes and their run status
    Process(ProcessArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}
