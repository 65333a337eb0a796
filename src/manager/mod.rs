//! Dataset lifecycle facade
//!
//! Owns the in-memory table of datasets, mirrors it on the durable store,
//! serializes add/remove per dataset id, and is the entry point queries are
//! validated and executed from.

mod datasets;
mod jobs;

pub use datasets::DatasetManager;
pub use jobs::InFlightJobs;
