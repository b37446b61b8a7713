//! Filesystem backends for the engine's loader and storage seams.
//!
//! The dataset is a single JSON file; engagement records live as one
//! JSON file per record key inside the state directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use daydeck_engine::{CardData, DataLoader, StateStorage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("i/o failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("dataset is not a valid card sequence: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FileStoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Loads the card dataset from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataLoader for FileLoader {
    type Error = FileStoreError;

    fn load_card_data(&self) -> Result<CardData, Self::Error> {
        let text = fs::read_to_string(&self.path)
            .map_err(|source| FileStoreError::io(&self.path, source))?;
        Ok(CardData::from_json(&text)?)
    }
}

/// One JSON file per record key inside a state directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Open the storage directory, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| FileStoreError::io(&dir, source))?;
        Ok(Self { dir })
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStorage for JsonFileStorage {
    type Error = FileStoreError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.record_path(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(FileStoreError::io(&path, err)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let path = self.record_path(key);
        fs::write(&path, value).map_err(|source| FileStoreError::io(&path, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_record_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::open(dir.path()).unwrap();
        assert!(storage.read("favorites").unwrap().is_none());
    }

    #[test]
    fn records_round_trip_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::open(dir.path()).unwrap();
        storage.write("favorites", r#"["Presence"]"#).unwrap();
        storage.write("cardHistory", r#"["Presence","Gratitude"]"#).unwrap();
        assert_eq!(
            storage.read("favorites").unwrap().as_deref(),
            Some(r#"["Presence"]"#)
        );
        assert_eq!(
            storage.read("cardHistory").unwrap().as_deref(),
            Some(r#"["Presence","Gratitude"]"#)
        );
    }

    #[test]
    fn writes_overwrite_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::open(dir.path()).unwrap();
        storage.write("stats", r#"{"totalCardsDrawn":1}"#).unwrap();
        storage.write("stats", r#"{"totalCardsDrawn":2}"#).unwrap();
        assert_eq!(
            storage.read("stats").unwrap().as_deref(),
            Some(r#"{"totalCardsDrawn":2}"#)
        );
    }

    #[test]
    fn loader_reports_missing_dataset_with_its_path() {
        let loader = FileLoader::new("/definitely/not/here/cards.json");
        let err = loader.load_card_data().unwrap_err();
        assert!(err.to_string().contains("cards.json"));
    }

    #[test]
    fn loader_parses_a_dataset_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");
        fs::write(&path, r#"[{"Concept": "Presence"}]"#).unwrap();
        let data = FileLoader::new(&path).load_card_data().unwrap();
        assert_eq!(data.len(), 1);
    }
}
