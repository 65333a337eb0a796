//! In-flight job tracking
//!
//! At most one outstanding add and one outstanding remove per dataset id.
//! Claiming is an atomic lookup-or-insert on a guarded set; a conflicting
//! claim is refused before any other work happens. The claim releases on
//! drop, so no failure path can leak it.

use std::collections::HashSet;
use std::sync::Mutex;

/// Tracks which dataset ids have an operation outstanding
#[derive(Debug, Default)]
pub struct InFlightJobs {
    ids: Mutex<HashSet<String>>,
}

impl InFlightJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id`. Returns `None` when a job for it is already in flight.
    pub fn begin(&self, id: &str) -> Option<JobGuard<'_>> {
        let mut ids = self.ids.lock().unwrap_or_else(|e| e.into_inner());
        if !ids.insert(id.to_string()) {
            return None;
        }
        Some(JobGuard {
            jobs: self,
            id: id.to_string(),
        })
    }
}

/// Releases the claimed id when dropped
#[derive(Debug)]
pub struct JobGuard<'a> {
    jobs: &'a InFlightJobs,
    id: String,
}

impl Drop for JobGuard<'_> {
    fn drop(&mut self) {
        let mut ids = self.jobs.ids.lock().unwrap_or_else(|e| e.into_inner());
        ids.remove(&self.id);
    }
}
