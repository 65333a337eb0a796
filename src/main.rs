//! facetdb CLI entry point
//!
//! Parses arguments, dispatches to the CLI module, prints errors to stderr,
//! exits non-zero on failure. All logic lives in the library.

use facetdb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
