//! `localStorage` du navigateur derrière le trait `lms_gate::Storage`.

use gloo::storage::{errors::StorageError as GlooError, LocalStorage, Storage as _};
use lms_gate::{Storage, StorageError};

/// Values are stored JSON-encoded, the way `gloo::storage` does it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

fn to_gate(e: GlooError) -> StorageError {
    StorageError::Backend(e.to_string())
}

impl Storage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match LocalStorage::get::<String>(key) {
            Ok(v) => Ok(Some(v)),
            Err(GlooError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(to_gate(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::set(key, value).map_err(to_gate)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        LocalStorage::delete(key);
        Ok(())
    }
}
