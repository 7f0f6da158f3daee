use crate::application::key_value_store::{KeyValueStore, StorageError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In memory key/value store.
/// This is primarily intended for testing and as a reference
/// implementation of the KeyValueStore trait; values do not survive the
/// process.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self
            .entries
            .lock()
            .map_err(|_| StorageError::Internal("entries mutex poisoned".into()))?;

        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self
            .entries
            .lock()
            .map_err(|_| StorageError::Internal("entries mutex poisoned".into()))?;

        map.insert(key.to_string(), value.to_string());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_key_reads_as_none() {
        let store = MemoryStore::default();
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let store = MemoryStore::default();
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }
}
