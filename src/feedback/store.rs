//! Flat-file feedback store
//!
//! The whole history lives in one JSON array. Every append reads the full
//! array, pushes one record and writes the array back through a temporary
//! sibling file that is renamed into place, so a failed write leaves the
//! previous contents intact.
//!
//! Appends from one process are serialized by an async mutex. Nothing guards
//! against a second process writing the same file: concurrent writers there
//! can still lose updates.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::{AppError, Result};
use crate::feedback::types::{FeedbackInput, FeedbackRecord};

/// Append-only feedback store backed by a single JSON file
#[derive(Debug)]
pub struct FeedbackStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FeedbackStore {
    /// Create a store handle; nothing touches the disk until `initialize`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing file holding `[]` if it does not exist yet
    pub async fn initialize(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::storage(parent, e))?;
        }

        let exists = fs::try_exists(&self.path)
            .await
            .map_err(|e| AppError::storage(&self.path, e))?;
        if exists {
            debug!(path = %self.path.display(), "feedback store already present");
            return Ok(());
        }

        fs::write(&self.path, "[]")
            .await
            .map_err(|e| AppError::storage(&self.path, e))?;
        info!(path = %self.path.display(), "created feedback store");
        Ok(())
    }

    /// Append one record, stamping `id` and `timestamp`
    pub async fn append(&self, input: FeedbackInput) -> Result<FeedbackRecord> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_all().await?;
        let timestamp = now_millis();
        let id = next_id(&records, timestamp)
            .ok_or_else(|| AppError::storage(&self.path, "numeric record ids exhausted"))?;
        let record = input.into_record(id, timestamp);
        records.push(record.clone());

        self.write_all(&records).await?;
        debug!(id = %record.id, rating = record.rating, total = records.len(), "feedback appended");
        Ok(record)
    }

    /// Full history in insertion order
    pub async fn read_all(&self) -> Result<Vec<FeedbackRecord>> {
        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(|e| AppError::storage(&self.path, e))?;

        serde_json::from_str(&raw).map_err(|e| AppError::storage(&self.path, e))
    }

    async fn write_all(&self, records: &[FeedbackRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.temp_path();

        fs::write(&tmp, json)
            .await
            .map_err(|e| AppError::storage(&tmp, e))?;

        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(AppError::storage(&self.path, e));
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("feedback"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Current time at millisecond precision, matching the stored format
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(TimeDelta::milliseconds(1)).unwrap_or(now)
}

/// Millisecond clock value, bumped past any existing numeric id.
/// `None` once the highest id is `i64::MAX`.
fn next_id(existing: &[FeedbackRecord], at: DateTime<Utc>) -> Option<String> {
    let clock = at.timestamp_millis();
    let highest = existing
        .iter()
        .filter_map(|r| r.id.parse::<i64>().ok())
        .max();

    match highest {
        Some(h) if h >= clock => h.checked_add(1).map(|id| id.to_string()),
        _ => Some(clock.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn create_test_store() -> (FeedbackStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FeedbackStore::new(temp_dir.path().join("feedback-data.json"));
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_initialize_creates_empty_array() {
        let (store, _temp) = create_test_store();
        store.initialize().await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "[]");
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let (store, _temp) = create_test_store();
        store.initialize().await.unwrap();
        store.append(FeedbackInput::rated(4)).await.unwrap();
        store.initialize().await.unwrap();

        assert_eq!(store.read_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_initialize_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let store = FeedbackStore::new(temp.path().join("a").join("b").join("feedback.json"));
        store.initialize().await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_append_preserves_order_and_unique_ids() {
        let (store, _temp) = create_test_store();
        store.initialize().await.unwrap();

        for rating in [5, 1, 4, 3, 5] {
            store.append(FeedbackInput::rated(rating)).await.unwrap();
        }

        let records = store.read_all().await.unwrap();
        let ratings: Vec<i32> = records.iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![5, 1, 4, 3, 5]);

        let ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn test_timestamp_not_before_submission() {
        let (store, _temp) = create_test_store();
        store.initialize().await.unwrap();

        let before = now_millis();
        let record = store.append(FeedbackInput::rated(3)).await.unwrap();
        assert!(record.timestamp >= before);
    }

    #[tokio::test]
    async fn test_append_without_initialize_fails() {
        let (store, _temp) = create_test_store();
        let err = store.append(FeedbackInput::rated(3)).await.unwrap_err();
        assert!(matches!(err, AppError::StorageIo { .. }));
    }

    #[tokio::test]
    async fn test_malformed_file_is_storage_error() {
        let (store, _temp) = create_test_store();
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(
            store.read_all().await,
            Err(AppError::StorageIo { .. })
        ));
        assert!(store.append(FeedbackInput::rated(5)).await.is_err());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let (store, temp) = create_test_store();
        store.initialize().await.unwrap();
        store.append(FeedbackInput::rated(2)).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["feedback-data.json".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_in_process_are_not_lost() {
        let (store, _temp) = create_test_store();
        store.initialize().await.unwrap();
        let store = std::sync::Arc::new(store);

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append(FeedbackInput::rated(i % 5 + 1)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.read_all().await.unwrap().len(), 8);
    }

    #[test]
    fn test_next_id_bumps_past_collisions() {
        let at = Utc::now();
        let clock = at.timestamp_millis();
        let existing = vec![FeedbackInput::rated(5).into_record(clock.to_string(), at)];

        assert_eq!(next_id(&existing, at), Some((clock + 1).to_string()));
        assert_eq!(next_id(&[], at), Some(clock.to_string()));
    }

    #[test]
    fn test_next_id_at_numeric_ceiling() {
        let at = Utc::now();
        let existing = vec![FeedbackInput::rated(5).into_record(i64::MAX.to_string(), at)];
        assert_eq!(next_id(&existing, at), None);
    }

    #[tokio::test]
    async fn test_append_after_max_id_is_storage_error() {
        let (store, _temp) = create_test_store();
        let record = FeedbackInput::rated(4).into_record(i64::MAX.to_string(), Utc::now());
        std::fs::write(store.path(), serde_json::to_string(&vec![record]).unwrap()).unwrap();

        let err = store.append(FeedbackInput::rated(5)).await.unwrap_err();
        assert!(matches!(err, AppError::StorageIo { .. }));
        assert_eq!(store.read_all().await.unwrap().len(), 1);
    }

    #[test]
    fn test_next_id_ignores_non_numeric_ids() {
        let at = Utc::now();
        let existing = vec![FeedbackInput::rated(5).into_record("legacy-abc".to_string(), at)];
        assert_eq!(next_id(&existing, at), Some(at.timestamp_millis().to_string()));
    }
}
