//! Dataset manager
//!
//! The facade embedders call. State is an in-memory dataset table mirrored
//! on the durable store; a dataset becomes visible to queries only after
//! ingestion, persistence and in-memory registration all complete. Lock
//! order is store before table on every mutating path.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};

use serde_json::Value;

use crate::engine::{QueryExecutor, ResultRow};
use crate::error::{FacadeError, FacadeResult};
use crate::ingest::{
    JsonRoomParser, JsonSectionParser, RoomParser, SectionParser, StaticGeoLookup,
};
use crate::model::{Dataset, DatasetKind, DatasetSummary, Rows};
use crate::observability::Logger;
use crate::storage::DatasetStore;
use crate::validator::QueryValidator;

use super::jobs::InFlightJobs;

/// Dataset lifecycle manager and query entry point
pub struct DatasetManager {
    datasets: RwLock<HashMap<String, Dataset>>,
    store: Mutex<DatasetStore>,
    add_jobs: InFlightJobs,
    remove_jobs: InFlightJobs,
    section_parser: Box<dyn SectionParser>,
    room_parser: Box<dyn RoomParser>,
}

impl std::fmt::Debug for DatasetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetManager").finish_non_exhaustive()
    }
}

impl DatasetManager {
    /// Open a manager over `data_dir` with the shipped JSON parsers.
    ///
    /// Restores every persisted dataset; corrupted persisted state fails
    /// construction.
    pub fn open(data_dir: &Path) -> FacadeResult<Self> {
        Self::with_parsers(
            data_dir,
            Box::new(JsonSectionParser::new()),
            Box::new(JsonRoomParser::new(StaticGeoLookup::new())),
        )
    }

    /// Open a manager with caller-supplied parser collaborators
    pub fn with_parsers(
        data_dir: &Path,
        section_parser: Box<dyn SectionParser>,
        room_parser: Box<dyn RoomParser>,
    ) -> FacadeResult<Self> {
        let (store, datasets) = DatasetStore::open(data_dir)?;
        Logger::info(
            "STORE_RESTORED",
            &[("datasets", &datasets.len().to_string())],
        );
        Ok(Self {
            datasets: RwLock::new(datasets),
            store: Mutex::new(store),
            add_jobs: InFlightJobs::new(),
            remove_jobs: InFlightJobs::new(),
            section_parser,
            room_parser,
        })
    }

    /// Add a dataset. Returns the ids of every dataset held afterwards.
    pub fn add_dataset(
        &self,
        id: &str,
        content: &str,
        kind: DatasetKind,
    ) -> FacadeResult<Vec<String>> {
        let _job = self.add_jobs.begin(id).ok_or_else(|| {
            FacadeError::invalid_input(format!("A dataset {} is already being added", id))
        })?;

        validate_dataset_id(id)?;
        if content.is_empty() {
            return Err(FacadeError::invalid_input("Dataset content is empty"));
        }
        if self.read_table().contains_key(id) {
            return Err(FacadeError::invalid_input(format!(
                "Dataset {} already exists",
                id
            )));
        }

        let rows = match kind {
            DatasetKind::Sections => Rows::Sections(
                self.section_parser
                    .parse(content)
                    .map_err(|e| FacadeError::invalid_input(e.to_string()))?,
            ),
            DatasetKind::Rooms => Rows::Rooms(
                self.room_parser
                    .parse(content)
                    .map_err(|e| FacadeError::invalid_input(e.to_string()))?,
            ),
        };
        let dataset = Dataset::new(kind, rows);

        // Durable first; the dataset is only queryable once both complete
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.save(id, &dataset)?;
        let num_rows = dataset.num_rows();
        let mut datasets = self.write_table();
        datasets.insert(id.to_string(), dataset);

        Logger::info(
            "DATASET_ADDED",
            &[
                ("id", id),
                ("kind", kind.as_str()),
                ("rows", &num_rows.to_string()),
            ],
        );

        let mut ids: Vec<String> = datasets.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Remove a dataset. Returns the removed id.
    pub fn remove_dataset(&self, id: &str) -> FacadeResult<String> {
        let _job = self.remove_jobs.begin(id).ok_or_else(|| {
            FacadeError::invalid_input(format!("A dataset {} is already being removed", id))
        })?;

        validate_dataset_id(id)?;
        if !self.read_table().contains_key(id) {
            return Err(FacadeError::not_found(format!(
                "Dataset {} does not exist",
                id
            )));
        }

        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.remove(id)?;
        let mut datasets = self.write_table();
        datasets.remove(id);

        Logger::info("DATASET_REMOVED", &[("id", id)]);
        Ok(id.to_string())
    }

    /// Validate and execute a query against the current snapshot
    pub fn perform_query(&self, raw: &Value) -> FacadeResult<Vec<ResultRow>> {
        let datasets = self.read_table();
        let id_to_kind: HashMap<String, DatasetKind> = datasets
            .iter()
            .map(|(id, dataset)| (id.clone(), dataset.kind))
            .collect();

        let parsed = QueryValidator::new(id_to_kind).validate(raw).map_err(|e| {
            Logger::warn("QUERY_REJECTED", &[("reason", &e.to_string())]);
            e
        })?;

        let dataset = match datasets.get(&parsed.dataset_id) {
            Some(dataset) => dataset,
            None => unreachable!("validated dataset {} not held", parsed.dataset_id),
        };

        let executor = QueryExecutor::new(&parsed.dataset_id);
        let result = match &dataset.rows {
            Rows::Sections(rows) => executor.execute(rows, &parsed),
            Rows::Rooms(rows) => executor.execute(rows, &parsed),
        }?;

        Logger::info(
            "QUERY_COMPLETE",
            &[
                ("dataset", parsed.dataset_id.as_str()),
                ("rows", &result.len().to_string()),
            ],
        );
        Ok(result)
    }

    /// List every held dataset with its id, kind and row count
    pub fn list_datasets(&self) -> Vec<DatasetSummary> {
        let datasets = self.read_table();
        let mut summaries: Vec<DatasetSummary> = datasets
            .iter()
            .map(|(id, dataset)| DatasetSummary {
                id: id.clone(),
                kind: dataset.kind,
                num_rows: dataset.num_rows(),
            })
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    fn read_table(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Dataset>> {
        self.datasets.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_table(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Dataset>> {
        self.datasets.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// A dataset id must be non-empty, contain no underscore, and not be all
/// whitespace
fn validate_dataset_id(id: &str) -> FacadeResult<()> {
    if id.is_empty() || id.contains('_') || id.trim().is_empty() {
        return Err(FacadeError::invalid_input(format!(
            "Invalid dataset id \"{}\"",
            id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_id_rules() {
        assert!(validate_dataset_id("sections").is_ok());
        assert!(validate_dataset_id("se ct ions").is_ok());
        assert!(validate_dataset_id("a_b").is_err());
        assert!(validate_dataset_id("").is_err());
        assert!(validate_dataset_id("   ").is_err());
        assert!(validate_dataset_id("\t").is_err());
    }
}
