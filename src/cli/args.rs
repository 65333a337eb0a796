//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::model::DatasetKind;

/// facetdb - An embeddable, deterministic dataset query engine
#[derive(Parser, Debug)]
#[command(name = "facetdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a dataset from a JSON records file
    Add {
        /// Dataset id (no underscores)
        id: String,

        /// Dataset kind
        #[arg(long, value_enum)]
        kind: KindArg,

        /// Path to the JSON records file
        #[arg(long)]
        content: PathBuf,

        /// Data directory
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Remove a dataset
    Remove {
        /// Dataset id
        id: String,

        /// Data directory
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// List held datasets
    List {
        /// Data directory
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Execute a query document and print the result rows
    Query {
        /// Path to the query JSON file
        #[arg(long)]
        file: PathBuf,

        /// Data directory
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },
}

/// Dataset kind as a CLI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Sections,
    Rooms,
}

impl From<KindArg> for DatasetKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Sections => DatasetKind::Sections,
            KindArg::Rooms => DatasetKind::Rooms,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
