pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::models::record::UserHistory;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt history: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable per-user history. Each call is atomic: readers never observe a
/// partially written history.
pub trait RecordStore: Send {
    fn get(&self, user_id: &str) -> Result<Option<UserHistory>, StorageError>;
    fn put(&mut self, user_id: &str, history: &UserHistory) -> Result<(), StorageError>;
}

/// Reads a JSON file, or `None` when it does not exist yet.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// Writes pretty JSON through a sibling temp file and a rename.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// User ids become file names, so only a conservative alphabet is accepted.
pub(crate) fn validate_user_id(user_id: &str) -> Result<(), StorageError> {
    let ok = !user_id.is_empty()
        && user_id.len() <= 128
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
        && !user_id.starts_with('.');
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidUserId(user_id.to_string()))
    }
}
