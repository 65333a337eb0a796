//! CLI command implementations
//!
//! Each command opens the manager over the requested data directory, runs
//! one facade operation, and prints the outcome as JSON on stdout.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::manager::DatasetManager;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parse arguments and dispatch the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}

/// Run one command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Add {
            id,
            kind,
            content,
            data_dir,
        } => {
            let body = read_file(&content)?;
            let manager = DatasetManager::open(&data_dir)?;
            let ids = manager.add_dataset(&id, &body, kind.into())?;
            print_json(&json!({ "added": id, "datasets": ids }));
            Ok(())
        }
        Command::Remove { id, data_dir } => {
            let manager = DatasetManager::open(&data_dir)?;
            let removed = manager.remove_dataset(&id)?;
            print_json(&json!({ "removed": removed }));
            Ok(())
        }
        Command::List { data_dir } => {
            let manager = DatasetManager::open(&data_dir)?;
            let summaries = manager.list_datasets();
            print_json(&json!({ "datasets": summaries }));
            Ok(())
        }
        Command::Query { file, data_dir } => {
            let raw = read_json(&file)?;
            let manager = DatasetManager::open(&data_dir)?;
            let rows = manager.perform_query(&raw)?;
            print_json(&json!({ "result": rows }));
            Ok(())
        }
    }
}

fn read_file(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|e| CliError::file_read(path, e))
}

fn read_json(path: &Path) -> CliResult<Value> {
    let body = read_file(path)?;
    serde_json::from_str(&body).map_err(|e| CliError::file_not_json(path, e.to_string()))
}

fn print_json(value: &Value) {
    println!("{:#}", value);
}
