//! Error taxonomy for the reminder engine
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Typed errors for store, validation, delivery and lifecycle

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the persisted reminder document
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document exists but cannot be parsed
    #[error("reminder store at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("reminder store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize reminders: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Edit or removal addressed an index the owner does not have
    #[error("reminder #{index} not found for owner {owner_id}")]
    NotFound { owner_id: String, index: usize },
}

/// A reminder record that does not describe a schedulable reminder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("reminder title is empty")]
    EmptyTitle,

    #[error("invalid time '{0}', expected 24h HH:MM")]
    InvalidTime(String),

    #[error("no repeat days selected")]
    NoDays,

    #[error("unknown weekday '{0}'")]
    UnknownWeekday(String),

    #[error("lead minutes must not be negative (got {0})")]
    NegativeLead(i64),

    #[error("reminder has no channel")]
    MissingChannel,

    /// A persisted field holds a value of the wrong JSON type
    #[error("field '{0}' has the wrong type")]
    MalformedField(String),
}

/// A single notification could not be delivered
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("channel {channel_id} is unavailable: {reason}")]
    ChannelUnavailable { channel_id: u64, reason: String },

    #[error("discord request failed: {0}")]
    Discord(String),
}

/// Misuse of the scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("reminder scheduler is already running")]
    AlreadyRunning,

    #[error("reminder scheduler is not running")]
    NotRunning,
}

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("activity log I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize activity entry: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::InvalidTime("25:00".to_string()).to_string(),
            "invalid time '25:00', expected 24h HH:MM"
        );
        assert_eq!(ValidationError::NoDays.to_string(), "no repeat days selected");
    }

    #[test]
    fn test_store_not_found_message() {
        let err = StoreError::NotFound {
            owner_id: "42".to_string(),
            index: 3,
        };
        assert_eq!(err.to_string(), "reminder #3 not found for owner 42");
    }

    #[test]
    fn test_corrupt_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StoreError::Corrupt {
            path: PathBuf::from("data/reminders.json"),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("data/reminders.json"));
    }
}
