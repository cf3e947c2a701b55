//! Environment configuration
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Add LOG_FILE and DELIVERY_TIMEOUT_SECS
//! - 1.0.0: Initial creation

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_DELIVERY_TIMEOUT_SECS: u64 = 15;

/// Runtime configuration loaded from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub discord_guild_id: Option<String>,
    pub data_dir: PathBuf,
    pub reminders_path: PathBuf,
    pub activity_dir: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub delivery_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_token =
            get("DISCORD_TOKEN").context("DISCORD_TOKEN must be set in the environment")?;

        let data_dir = PathBuf::from(get("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.into()));
        let reminders_path = get("REMINDERS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("reminders.json"));
        let activity_dir = get("ACTIVITY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("logs"));

        let delivery_timeout_secs = match get("DELIVERY_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("DELIVERY_TIMEOUT_SECS is not a number: {raw}"))?,
            None => DEFAULT_DELIVERY_TIMEOUT_SECS,
        };

        Ok(Self {
            discord_token,
            discord_guild_id: get("DISCORD_GUILD_ID"),
            data_dir,
            reminders_path,
            activity_dir,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.into()),
            log_file: get("LOG_FILE").map(PathBuf::from),
            delivery_timeout: Duration::from_secs(delivery_timeout_secs.max(1)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "abc")])).unwrap();
        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.reminders_path, PathBuf::from("data/reminders.json"));
        assert_eq!(config.activity_dir, PathBuf::from("data/logs"));
        assert_eq!(config.log_level, "info");
        assert!(config.log_file.is_none());
        assert!(config.discord_guild_id.is_none());
        assert_eq!(config.delivery_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_missing_token_is_error() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("DISCORD_TOKEN", "  ")])).is_err());
    }

    #[test]
    fn test_data_dir_drives_paths() {
        let config = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("DATA_DIR", "/var/lib/remindbot"),
            ("ACTIVITY_DIR", "/var/log/remindbot"),
        ]))
        .unwrap();
        assert_eq!(
            config.reminders_path,
            PathBuf::from("/var/lib/remindbot/reminders.json")
        );
        assert_eq!(config.activity_dir, PathBuf::from("/var/log/remindbot"));
    }

    #[test]
    fn test_bad_timeout_is_error() {
        let result = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("DELIVERY_TIMEOUT_SECS", "soon"),
        ]));
        assert!(result.is_err());
    }
}
