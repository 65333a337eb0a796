//! Persisted store index
//!
//! Maps dataset ids to their data file ids and carries the next-file-id
//! counter, so the counter survives restarts with the index instead of
//! living in process-wide state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One indexed dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Opaque integer the data file is named by
    pub file_id: u64,
    /// CRC32 of the data file bytes
    pub checksum: u32,
}

/// The persisted index file content
///
/// `BTreeMap` keeps the serialized form deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreIndex {
    /// Next file id to assign; monotonically increasing, never reused
    pub next_file_id: u64,
    /// Dataset id to data file entry
    pub entries: BTreeMap<String, IndexEntry>,
}

impl StoreIndex {
    /// Take the next file id and advance the counter
    pub fn allocate_file_id(&mut self) -> u64 {
        let file_id = self.next_file_id;
        self.next_file_id += 1;
        file_id
    }
}
