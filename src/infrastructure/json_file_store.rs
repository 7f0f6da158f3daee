// File-backed key/value store - the durable analog of browser storage
use crate::application::key_value_store::{KeyValueStore, StorageError};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Persists all keys in a single JSON object file. Reads and writes are
/// whole-file; the data here is a handful of short strings, not a database.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| StorageError::Internal(format!("corrupt store file: {}", e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| StorageError::Internal(format!("encode failed: {}", e)))?;
        fs::write(&self.path, json)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> JsonFileStore {
        let mut path = std::env::temp_dir();
        path.push(format!("piste-weather-test-{}-{}.json", name, std::process::id()));
        let _ = fs::remove_file(&path);
        JsonFileStore::new(path)
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let store = temp_store("missing");
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_values_survive_a_new_store_instance() {
        let store = temp_store("reload");
        store.set("dismissed", r#"["a","b"]"#).unwrap();

        let reopened = JsonFileStore::new(store.path.clone());
        assert_eq!(
            reopened.get("dismissed").unwrap().as_deref(),
            Some(r#"["a","b"]"#)
        );
        let _ = fs::remove_file(&store.path);
    }

    #[test]
    fn test_corrupt_file_is_an_error_not_a_panic() {
        let store = temp_store("corrupt");
        fs::write(&store.path, "{ not json").unwrap();
        assert!(store.get("k").is_err());
        let _ = fs::remove_file(&store.path);
    }
}
