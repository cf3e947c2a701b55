//! Shared context for command handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Reminder store, activity log and draft book replace the chat services
//! - 1.0.0: Initial implementation with core shared state

use crate::features::activity::ActivityLog;
use crate::features::reminders::{DraftBook, ReminderStore};

/// Services every handler can reach
#[derive(Clone)]
pub struct CommandContext {
    pub store: ReminderStore,
    pub activity: ActivityLog,
    pub drafts: DraftBook,
}

impl CommandContext {
    pub fn new(store: ReminderStore, activity: ActivityLog) -> Self {
        Self {
            store,
            activity,
            drafts: DraftBook::default(),
        }
    }
}
