//! JSON-file reminder store
//!
//! The whole dataset is read on every load and rewritten on every save. Saves
//! go through a sibling temp file and a rename so a crash never leaves a
//! half-written document behind.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Serialized read-modify-write helpers for the command surface
//! - 1.0.0: Initial load/save with atomic replace

use crate::core::StoreError;
use crate::features::reminders::model::{ReminderDataset, ReminderDefinition, ReminderRecord};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

struct StoreInner {
    path: PathBuf,
    // Orders mutations from concurrent interactions; plain loads never take it
    write_lock: Mutex<()>,
}

/// Handle to the persisted reminder document, cheap to clone
#[derive(Clone)]
pub struct ReminderStore {
    inner: Arc<StoreInner>,
}

impl ReminderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                path: path.into(),
                write_lock: Mutex::new(()),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Read the full dataset; a missing file is an empty dataset
    pub async fn load(&self) -> Result<ReminderDataset, StoreError> {
        let path = self.path();
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No reminder store at {}, starting empty", path.display());
                return Ok(ReminderDataset::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replace the persisted dataset with `dataset`
    pub async fn save(&self, dataset: &ReminderDataset) -> Result<(), StoreError> {
        let path = self.path();
        let json = serde_json::to_vec_pretty(dataset).map_err(StoreError::Serialize)?;
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let tmp = temp_path(path);
        let mut file = tokio::fs::File::create(&tmp).await.map_err(io_err)?;
        file.write_all(&json).await.map_err(io_err)?;
        file.sync_all().await.map_err(io_err)?;
        drop(file);

        tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
        debug!(
            "Saved {} reminder owners to {}",
            dataset.len(),
            path.display()
        );
        Ok(())
    }

    /// Reminders owned by `owner_id`, in creation order
    pub async fn reminders_for(&self, owner_id: &str) -> Result<Vec<ReminderRecord>, StoreError> {
        Ok(self.load().await?.remove(owner_id).unwrap_or_default())
    }

    /// Append a reminder for `owner_id`, returning its index
    pub async fn append(
        &self,
        owner_id: &str,
        definition: &ReminderDefinition,
    ) -> Result<usize, StoreError> {
        self.update(|dataset| {
            let reminders = dataset.entry(owner_id.to_string()).or_default();
            reminders.push(definition.to_record(true));
            Ok(reminders.len() - 1)
        })
        .await
    }

    /// Overwrite the reminder at `index`, keeping its mention preference
    pub async fn replace(
        &self,
        owner_id: &str,
        index: usize,
        definition: &ReminderDefinition,
    ) -> Result<(), StoreError> {
        self.update(|dataset| {
            let slot = dataset
                .get_mut(owner_id)
                .and_then(|reminders| reminders.get_mut(index))
                .ok_or_else(|| not_found(owner_id, index))?;
            *slot = definition.to_record(slot.user_mention);
            Ok(())
        })
        .await
    }

    /// Remove the reminder at `index`; later reminders shift down by one
    pub async fn remove(&self, owner_id: &str, index: usize) -> Result<ReminderRecord, StoreError> {
        self.update(|dataset| {
            let reminders = dataset
                .get_mut(owner_id)
                .filter(|reminders| index < reminders.len())
                .ok_or_else(|| not_found(owner_id, index))?;
            let removed = reminders.remove(index);
            if reminders.is_empty() {
                dataset.remove(owner_id);
            }
            Ok(removed)
        })
        .await
    }

    async fn update<T, F>(&self, mutate: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut ReminderDataset) -> Result<T, StoreError>,
    {
        let _guard = self.inner.write_lock.lock().await;
        let mut dataset = self.load().await?;
        let result = mutate(&mut dataset)?;
        self.save(&dataset).await?;
        Ok(result)
    }
}

fn not_found(owner_id: &str, index: usize) -> StoreError {
    StoreError::NotFound {
        owner_id: owner_id.to_string(),
        index,
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "reminders".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::model::{DaySet, TimeOfDay};
    use chrono::Weekday;

    fn definition(title: &str) -> ReminderDefinition {
        ReminderDefinition::new(
            title,
            TimeOfDay::parse("09:00").unwrap(),
            vec!["Water".to_string()],
            5,
            [Weekday::Mon].into_iter().collect::<DaySet>(),
            42,
        )
        .unwrap()
    }

    fn store_in(dir: &tempfile::TempDir) -> ReminderStore {
        ReminderStore::new(dir.path().join("nested").join("reminders.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().await.unwrap().is_empty());
        assert!(store.reminders_for("1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders.json");
        std::fs::write(&path, "{\"1\": [").unwrap();
        let store = ReminderStore::new(&path);
        assert!(matches!(
            store.load().await,
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn test_save_load_round_trip_keeps_invalid_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut dataset = ReminderDataset::new();
        dataset.insert("7".to_string(), vec![definition("Stretch").to_record(false)]);
        dataset.insert(
            "8".to_string(),
            vec![ReminderRecord {
                title: "Broken".to_string(),
                time: "25:99".to_string(),
                checklist: vec![],
                delay: 0,
                channel_id: None,
                days: vec![],
                ..ReminderRecord::default()
            }],
        );

        store.save(&dataset).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, dataset);

        store.save(&loaded).await.unwrap();
        assert_eq!(store.load().await.unwrap(), dataset);
        assert!(!dir.path().join("nested").join("reminders.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_mistyped_record_does_not_poison_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders.json");
        std::fs::write(
            &path,
            r#"{
  "1": [{"title":"Standup","time":"09:00","delay":5,"channel_id":10,"days":["Monday"]}],
  "2": [{"title":"Broken","time":"09:00","delay":{"minutes":5},"channel_id":10,"days":["Monday"]}],
  "3": [{"title":"Nulls","time":"09:00","delay":null,"channel_id":10,"days":["Monday"]}]
}"#,
        )
        .unwrap();
        let store = ReminderStore::new(&path);

        let loaded = store.load().await.unwrap();
        assert!(loaded["1"][0].validate().is_ok());
        assert!(matches!(
            loaded["2"][0].validate(),
            Err(crate::core::ValidationError::MalformedField(field)) if field == "delay"
        ));
        assert_eq!(loaded["3"][0].delay, 0);

        store.save(&loaded).await.unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["2"][0]["delay"], serde_json::json!({"minutes": 5}));
        assert_eq!(store.load().await.unwrap(), loaded);
    }

    #[tokio::test]
    async fn test_document_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append("99", &definition("Stretch")).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let record = &value["99"][0];
        assert_eq!(record["title"], "Stretch");
        assert_eq!(record["time"], "09:00");
        assert_eq!(record["delay"], 5);
        assert_eq!(record["channel_id"], 42);
        assert_eq!(record["days"], serde_json::json!(["Monday"]));
        assert_eq!(record["checklist"], serde_json::json!(["Water"]));
    }

    #[tokio::test]
    async fn test_append_replace_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.append("1", &definition("First")).await.unwrap(), 0);
        assert_eq!(store.append("1", &definition("Second")).await.unwrap(), 1);

        store.replace("1", 1, &definition("Renamed")).await.unwrap();
        let titles: Vec<String> = store
            .reminders_for("1")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["First", "Renamed"]);

        let removed = store.remove("1", 0).await.unwrap();
        assert_eq!(removed.title, "First");
        assert_eq!(store.reminders_for("1").await.unwrap()[0].title, "Renamed");

        store.remove("1", 0).await.unwrap();
        assert!(!store.load().await.unwrap().contains_key("1"));
    }

    #[tokio::test]
    async fn test_out_of_range_index_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append("1", &definition("Only")).await.unwrap();

        assert!(matches!(
            store.replace("1", 3, &definition("Nope")).await,
            Err(StoreError::NotFound { index: 3, .. })
        ));
        assert!(matches!(
            store.remove("2", 0).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_replace_keeps_mention_preference() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let mut dataset = ReminderDataset::new();
        dataset.insert("1".to_string(), vec![definition("Quiet").to_record(false)]);
        store.save(&dataset).await.unwrap();

        store.replace("1", 0, &definition("Still quiet")).await.unwrap();
        let record = &store.reminders_for("1").await.unwrap()[0];
        assert_eq!(record.title, "Still quiet");
        assert!(!record.user_mention);
    }
}
