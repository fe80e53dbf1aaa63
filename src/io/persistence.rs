//! Dictionary persistence seam.
//!
//! The core mandates only the [`DictionaryEntry`] shape; the storage medium
//! is the host's choice. [`JsonDictionaryStorage`] is the shipped file-based
//! implementation, one JSON document per named dictionary. Storage failures
//! are the only I/O errors surfaced to callers of the public API.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{Result, RunelintError};
use crate::dictionary::store::DictionaryEntry;

/// Host-pluggable dictionary storage.
pub trait DictionaryStorage: Send + Sync {
    /// Load the entries of a named dictionary.
    fn load(&self, name: &str) -> Result<Vec<DictionaryEntry>>;

    /// Persist the entries of a named dictionary.
    fn save(&self, name: &str, entries: &[DictionaryEntry]) -> Result<()>;
}

/// On-disk document shape for one dictionary.
#[derive(Debug, Serialize, Deserialize)]
struct DictionaryFile {
    name: String,
    entries: Vec<DictionaryEntry>,
}

/// JSON file storage: `<root>/<name>.json` per dictionary.
#[derive(Debug, Clone)]
pub struct JsonDictionaryStorage {
    root: PathBuf,
}

impl JsonDictionaryStorage {
    /// Create storage rooted at the given directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| {
            RunelintError::io(
                format!("Failed to create dictionary root {}", root.display()),
                err,
            )
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }
}

impl DictionaryStorage for JsonDictionaryStorage {
    fn load(&self, name: &str) -> Result<Vec<DictionaryEntry>> {
        let path = self.path_for(name);
        let raw = fs::read_to_string(&path).map_err(|err| {
            RunelintError::io(format!("Failed to read dictionary {}", path.display()), err)
        })?;
        let file: DictionaryFile = serde_json::from_str(&raw)?;
        debug!(dictionary = name, words = file.entries.len(), "loaded dictionary file");
        Ok(file.entries)
    }

    fn save(&self, name: &str, entries: &[DictionaryEntry]) -> Result<()> {
        let file = DictionaryFile {
            name: name.to_string(),
            entries: entries.to_vec(),
        };
        let serialized = serde_json::to_string_pretty(&file)?;

        // Write to a sibling temp file and rename so readers never observe a
        // half-written document.
        let path = self.path_for(name);
        let tmp = path.with_extension("json.tmp");
        write_file(&tmp, &serialized)?;
        fs::rename(&tmp, &path).map_err(|err| {
            RunelintError::io(format!("Failed to store dictionary {}", path.display()), err)
        })?;
        Ok(())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|err| {
        RunelintError::io(format!("Failed to write {}", path.display()), err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries() -> Vec<DictionaryEntry> {
        vec![
            DictionaryEntry::new("function"),
            DictionaryEntry::new("HTTP").case_sensitive(),
        ]
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = JsonDictionaryStorage::new(dir.path()).unwrap();

        storage.save("english", &entries()).unwrap();
        let loaded = storage.load("english").unwrap();

        assert_eq!(loaded, entries());
        assert!(loaded[1].case_sensitive);
    }

    #[test]
    fn test_load_missing_dictionary_is_io_error() {
        let dir = TempDir::new().unwrap();
        let storage = JsonDictionaryStorage::new(dir.path()).unwrap();

        let err = storage.load("absent").unwrap_err();
        assert!(matches!(err, RunelintError::Io { .. }));
    }

    #[test]
    fn test_load_malformed_file_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let storage = JsonDictionaryStorage::new(dir.path()).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let err = storage.load("broken").unwrap_err();
        assert!(matches!(err, RunelintError::Serialization { .. }));
    }

    #[test]
    fn test_save_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let storage = JsonDictionaryStorage::new(dir.path()).unwrap();

        storage.save("words", &entries()).unwrap();
        storage.save("words", &[DictionaryEntry::new("only")]).unwrap();

        let loaded = storage.load("words").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].word, "only");
    }
}
