//! Command-line interface
//!
//! Thin command surface over the dataset manager:
//! - add: ingest a dataset from a JSON file
//! - remove: delete a dataset
//! - list: show held datasets
//! - query: run a query document from a JSON file

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, KindArg};
pub use commands::run;
pub use errors::{CliError, CliResult};
