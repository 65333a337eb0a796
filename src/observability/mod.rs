//! Observability
//!
//! Structured, synchronous, deterministic logging. Observability is
//! read-only: nothing here influences execution.

mod logger;

pub use logger::{Logger, Severity};
