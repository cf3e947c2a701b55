//! # Features Layer
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Reminders rebuilt around weekly schedules; activity log added

pub mod activity;
pub mod reminders;

pub use activity::{ActivityLog, ActivityStatus, CompletionStats};
pub use reminders::{
    DiscordNotifier, ReminderScheduler, ReminderStore, SchedulerController, SchedulerState,
};
