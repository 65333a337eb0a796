//! Dataset file store
//!
//! Write path for one dataset: serialize, write the data file, sync it, then
//! replace the index through a temp file + rename. A crash between the two
//! writes leaves the old index intact and at worst an orphaned data file,
//! never a dangling reference. Restore verifies every data file against its
//! recorded checksum; a missing or corrupt file is fatal.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::model::Dataset;

use super::errors::{StorageError, StorageResult};
use super::index::{IndexEntry, StoreIndex};

const INDEX_FILE: &str = "index.json";
const INDEX_TEMP_FILE: &str = "index.json.tmp";

/// Durable key-value store for datasets
#[derive(Debug)]
pub struct DatasetStore {
    data_dir: PathBuf,
    index: StoreIndex,
}

impl DatasetStore {
    /// Open the store at `data_dir`, creating the directory if needed, and
    /// restore every indexed dataset.
    ///
    /// # Errors
    ///
    /// Fails with a fatal error if the index parses but references a missing
    /// data file, or if a data file fails its checksum or does not parse.
    pub fn open(data_dir: &Path) -> StorageResult<(Self, HashMap<String, Dataset>)> {
        fs::create_dir_all(data_dir).map_err(|e| StorageError::io(data_dir, e))?;

        let index_path = data_dir.join(INDEX_FILE);
        let index = match fs::read(&index_path) {
            Ok(bytes) => serde_json::from_slice::<StoreIndex>(&bytes)
                .map_err(|e| StorageError::malformed(&index_path, e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreIndex::default(),
            Err(e) => return Err(StorageError::io(&index_path, e)),
        };

        let store = Self {
            data_dir: data_dir.to_path_buf(),
            index,
        };
        let datasets = store.restore_all()?;
        Ok((store, datasets))
    }

    /// Persist one dataset under a freshly assigned file id
    pub fn save(&mut self, id: &str, dataset: &Dataset) -> StorageResult<()> {
        let bytes = match serde_json::to_vec(dataset) {
            Ok(bytes) => bytes,
            Err(e) => unreachable!("dataset serialization failed: {}", e),
        };
        let checksum = crc32fast::hash(&bytes);
        let file_id = self.index.allocate_file_id();
        let data_path = self.data_file_path(file_id);

        Self::write_synced(&data_path, &bytes)?;

        self.index
            .entries
            .insert(id.to_string(), IndexEntry { file_id, checksum });
        if let Err(e) = self.write_index() {
            // Index replace failed: forget the entry and the orphan file so
            // memory matches the durable state
            self.index.entries.remove(id);
            let _ = fs::remove_file(&data_path);
            return Err(e);
        }
        Ok(())
    }

    /// Remove one dataset: the index drops the reference first, then the
    /// data file goes away. An orphaned data file after a crash is harmless;
    /// a dangling index reference would not be.
    pub fn remove(&mut self, id: &str) -> StorageResult<()> {
        let entry = match self.index.entries.remove(id) {
            Some(entry) => entry,
            None => unreachable!("store removal of unindexed dataset {}", id),
        };
        if let Err(e) = self.write_index() {
            self.index.entries.insert(id.to_string(), entry);
            return Err(e);
        }

        let data_path = self.data_file_path(entry.file_id);
        match fs::remove_file(&data_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(&data_path, e)),
        }
    }

    /// Ids currently indexed, in sorted order
    pub fn indexed_ids(&self) -> Vec<String> {
        self.index.entries.keys().cloned().collect()
    }

    fn restore_all(&self) -> StorageResult<HashMap<String, Dataset>> {
        let mut datasets = HashMap::with_capacity(self.index.entries.len());
        for (id, entry) in &self.index.entries {
            let data_path = self.data_file_path(entry.file_id);
            let bytes = match fs::read(&data_path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(StorageError::MissingDataFile {
                        path: data_path.display().to_string(),
                    })
                }
                Err(e) => return Err(StorageError::io(&data_path, e)),
            };
            if crc32fast::hash(&bytes) != entry.checksum {
                return Err(StorageError::ChecksumMismatch {
                    path: data_path.display().to_string(),
                });
            }
            let dataset: Dataset = serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::malformed(&data_path, e.to_string()))?;
            datasets.insert(id.clone(), dataset);
        }
        Ok(datasets)
    }

    fn write_index(&self) -> StorageResult<()> {
        let bytes = match serde_json::to_vec(&self.index) {
            Ok(bytes) => bytes,
            Err(e) => unreachable!("index serialization failed: {}", e),
        };
        let temp_path = self.data_dir.join(INDEX_TEMP_FILE);
        let index_path = self.data_dir.join(INDEX_FILE);

        Self::write_synced(&temp_path, &bytes)?;
        fs::rename(&temp_path, &index_path).map_err(|e| StorageError::io(&index_path, e))
    }

    fn write_synced(path: &Path, bytes: &[u8]) -> StorageResult<()> {
        let mut file: File = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| StorageError::io(path, e))?;
        file.write_all(bytes).map_err(|e| StorageError::io(path, e))?;
        file.sync_all().map_err(|e| StorageError::io(path, e))
    }

    fn data_file_path(&self, file_id: u64) -> PathBuf {
        self.data_dir.join(format!("{}.json", file_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DatasetKind, Rows, Section};
    use tempfile::TempDir;

    fn sample_dataset() -> Dataset {
        Dataset::new(
            DatasetKind::Sections,
            Rows::Sections(vec![Section {
                dept: "cpsc".into(),
                id: "310".into(),
                instructor: "jo".into(),
                title: "se".into(),
                uuid: "1".into(),
                avg: 80.0,
                pass: 100.0,
                fail: 2.0,
                audit: 0.0,
                year: 2018.0,
            }]),
        )
    }

    #[test]
    fn test_save_then_reopen_restores() {
        let dir = TempDir::new().unwrap();
        {
            let (mut store, datasets) = DatasetStore::open(dir.path()).unwrap();
            assert!(datasets.is_empty());
            store.save("sections", &sample_dataset()).unwrap();
        }
        let (store, datasets) = DatasetStore::open(dir.path()).unwrap();
        assert_eq!(store.indexed_ids(), vec!["sections"]);
        assert_eq!(datasets.get("sections"), Some(&sample_dataset()));
    }

    #[test]
    fn test_remove_deletes_reference_and_file() {
        let dir = TempDir::new().unwrap();
        let (mut store, _) = DatasetStore::open(dir.path()).unwrap();
        store.save("sections", &sample_dataset()).unwrap();
        store.remove("sections").unwrap();
        assert!(store.indexed_ids().is_empty());
        assert!(!dir.path().join("0.json").exists());

        let (_, datasets) = DatasetStore::open(dir.path()).unwrap();
        assert!(datasets.is_empty());
    }

    #[test]
    fn test_file_ids_survive_restart() {
        let dir = TempDir::new().unwrap();
        {
            let (mut store, _) = DatasetStore::open(dir.path()).unwrap();
            store.save("a", &sample_dataset()).unwrap();
            store.remove("a").unwrap();
        }
        let (mut store, _) = DatasetStore::open(dir.path()).unwrap();
        store.save("b", &sample_dataset()).unwrap();
        // "a" consumed file id 0; "b" must not reuse it
        assert!(dir.path().join("1.json").exists());
    }

    #[test]
    fn test_corrupted_data_file_fails_open() {
        let dir = TempDir::new().unwrap();
        {
            let (mut store, _) = DatasetStore::open(dir.path()).unwrap();
            store.save("sections", &sample_dataset()).unwrap();
        }
        let data_path = dir.path().join("0.json");
        let mut bytes = fs::read(&data_path).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;
        fs::write(&data_path, bytes).unwrap();

        let err = DatasetStore::open(dir.path()).unwrap_err();
        assert!(err.is_fatal(), "corruption must be fatal, got: {}", err);
    }

    #[test]
    fn test_missing_data_file_fails_open() {
        let dir = TempDir::new().unwrap();
        {
            let (mut store, _) = DatasetStore::open(dir.path()).unwrap();
            store.save("sections", &sample_dataset()).unwrap();
        }
        fs::remove_file(dir.path().join("0.json")).unwrap();

        let err = DatasetStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, StorageError::MissingDataFile { .. }));
    }

    #[test]
    fn test_empty_dir_opens_clean() {
        let dir = TempDir::new().unwrap();
        let (store, datasets) = DatasetStore::open(dir.path()).unwrap();
        assert!(store.indexed_ids().is_empty());
        assert!(datasets.is_empty());
    }
}
