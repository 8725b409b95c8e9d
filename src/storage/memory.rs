use std::collections::HashMap;

use crate::models::record::UserHistory;
use crate::storage::{validate_user_id, RecordStore, StorageError};

/// Keeps each history as serialized JSON, so reads go through the same
/// serde path as the file store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored JSON for a user.
    pub fn raw(&self, user_id: &str) -> Option<&str> {
        self.blobs.get(user_id).map(String::as_str)
    }

    pub fn insert_raw(&mut self, user_id: &str, json: impl Into<String>) {
        self.blobs.insert(user_id.to_string(), json.into());
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, user_id: &str) -> Result<Option<UserHistory>, StorageError> {
        validate_user_id(user_id)?;
        self.blobs
            .get(user_id)
            .map(|json| serde_json::from_str(json))
            .transpose()
            .map_err(StorageError::from)
    }

    fn put(&mut self, user_id: &str, history: &UserHistory) -> Result<(), StorageError> {
        validate_user_id(user_id)?;
        let json = serde_json::to_string(history)?;
        self.blobs.insert(user_id.to_string(), json);
        Ok(())
    }
}
