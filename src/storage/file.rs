use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::record::UserHistory;
use crate::storage::{read_json, validate_user_id, write_json, RecordStore, StorageError};

/// One pretty-printed JSON file per user under `dir`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", user_id))
    }
}

impl RecordStore for JsonFileStore {
    fn get(&self, user_id: &str) -> Result<Option<UserHistory>, StorageError> {
        validate_user_id(user_id)?;
        read_json(&self.path_for(user_id))
    }

    fn put(&mut self, user_id: &str, history: &UserHistory) -> Result<(), StorageError> {
        validate_user_id(user_id)?;
        let path = self.path_for(user_id);
        write_json(&path, history)?;

        debug!("Wrote {} days to {}", history.trades.len(), path.display());
        Ok(())
    }
}
