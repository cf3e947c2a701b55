//! Append-only activity log
//!
//! One JSON-lines file per local date under the activity directory, named
//! `<YYYY-MM-DD>_log.jsonl`. Stats scan every file on demand.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0

use crate::core::ActivityError;
use chrono::NaiveDateTime;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

const FILE_SUFFIX: &str = "_log.jsonl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Done,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: NaiveDateTime,
    pub user_id: String,
    pub task: String,
    pub status: ActivityStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionStats {
    pub done: u64,
    pub skipped: u64,
}

impl CompletionStats {
    pub fn total(&self) -> u64 {
        self.done + self.skipped
    }

    /// Share of done tasks, rounded down; 0 when nothing was logged
    pub fn percent(&self) -> u64 {
        match self.total() {
            0 => 0,
            total => self.done * 100 / total,
        }
    }

    /// Reply text for `/stats`
    pub fn summary(&self) -> String {
        if self.total() == 0 {
            "You haven't completed or skipped any tasks yet.".to_string()
        } else {
            format!(
                "You've completed {}/{} tasks ({}% success rate).",
                self.done,
                self.total(),
                self.percent()
            )
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActivityLog {
    dir: PathBuf,
}

impl ActivityLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Append an entry stamped with the current local time
    pub async fn record(
        &self,
        user_id: &str,
        task: &str,
        status: ActivityStatus,
    ) -> Result<(), ActivityError> {
        self.record_at(chrono::Local::now().naive_local(), user_id, task, status)
            .await
    }

    pub async fn record_at(
        &self,
        timestamp: NaiveDateTime,
        user_id: &str,
        task: &str,
        status: ActivityStatus,
    ) -> Result<(), ActivityError> {
        let path = self.file_for(&timestamp);
        let io_err = |source| ActivityError::Io {
            path: path.clone(),
            source,
        };

        let entry = ActivityEntry {
            timestamp,
            user_id: user_id.to_string(),
            task: task.to_string(),
            status,
        };
        let mut line = serde_json::to_string(&entry).map_err(ActivityError::Serialize)?;
        line.push('\n');

        tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(io_err)?;
        file.write_all(line.as_bytes()).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;

        debug!("Logged {status:?} for '{task}' by user {user_id}");
        Ok(())
    }

    /// Count every done/skipped entry for `user_id` across all days
    pub async fn stats(&self, user_id: &str) -> Result<CompletionStats, ActivityError> {
        let mut stats = CompletionStats::default();

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(stats),
            Err(source) => {
                return Err(ActivityError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(source) => {
                    return Err(ActivityError::Io {
                        path: self.dir.clone(),
                        source,
                    })
                }
            };
            let path = entry.path();
            let is_log = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(FILE_SUFFIX));
            if !is_log {
                continue;
            }

            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| ActivityError::Io {
                    path: path.clone(),
                    source,
                })?;
            tally(&content, &path, user_id, &mut stats);
        }

        Ok(stats)
    }

    fn file_for(&self, timestamp: &NaiveDateTime) -> PathBuf {
        self.dir
            .join(format!("{}{FILE_SUFFIX}", timestamp.format("%Y-%m-%d")))
    }
}

fn tally(content: &str, path: &Path, user_id: &str, stats: &mut CompletionStats) {
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match serde_json::from_str::<ActivityEntry>(line) {
            Ok(entry) if entry.user_id == user_id => match entry.status {
                ActivityStatus::Done => stats.done += 1,
                ActivityStatus::Skipped => stats.skipped += 1,
            },
            Ok(_) => {}
            Err(e) => warn!("Ignoring malformed activity line in {}: {e}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_percent_rounds_down() {
        let stats = CompletionStats {
            done: 2,
            skipped: 1,
        };
        assert_eq!(stats.total(), 3);
        assert_eq!(stats.percent(), 66);
        assert_eq!(
            stats.summary(),
            "You've completed 2/3 tasks (66% success rate)."
        );
    }

    #[test]
    fn test_empty_stats_summary() {
        let stats = CompletionStats::default();
        assert_eq!(stats.percent(), 0);
        assert_eq!(
            stats.summary(),
            "You haven't completed or skipped any tasks yet."
        );
    }

    #[tokio::test]
    async fn test_missing_dir_has_no_activity() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path().join("logs"));
        assert_eq!(log.stats("1").await.unwrap(), CompletionStats::default());
    }

    #[tokio::test]
    async fn test_entries_go_to_daily_files() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path().join("logs"));

        log.record_at(at(4, 9), "1", "Standup", ActivityStatus::Done)
            .await
            .unwrap();
        log.record_at(at(4, 18), "1", "Stretch", ActivityStatus::Skipped)
            .await
            .unwrap();
        log.record_at(at(5, 9), "1", "Standup", ActivityStatus::Done)
            .await
            .unwrap();

        let first = std::fs::read_to_string(log.dir().join("2024-03-04_log.jsonl")).unwrap();
        assert_eq!(first.lines().count(), 2);
        let entry: serde_json::Value = serde_json::from_str(first.lines().next().unwrap()).unwrap();
        assert_eq!(entry["user_id"], "1");
        assert_eq!(entry["task"], "Standup");
        assert_eq!(entry["status"], "done");
        assert!(log.dir().join("2024-03-05_log.jsonl").exists());
    }

    #[tokio::test]
    async fn test_stats_per_user_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path());

        log.record_at(at(4, 9), "1", "Standup", ActivityStatus::Done)
            .await
            .unwrap();
        log.record_at(at(5, 9), "1", "Standup", ActivityStatus::Skipped)
            .await
            .unwrap();
        log.record_at(at(5, 9), "2", "Standup", ActivityStatus::Done)
            .await
            .unwrap();

        let path = dir.path().join("2024-03-05_log.jsonl");
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("not json\n");
        std::fs::write(&path, content).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "{}").unwrap();

        let stats = log.stats("1").await.unwrap();
        assert_eq!(
            stats,
            CompletionStats {
                done: 1,
                skipped: 1
            }
        );
        assert_eq!(stats.percent(), 50);
        assert_eq!(log.stats("2").await.unwrap().done, 1);
    }
}
