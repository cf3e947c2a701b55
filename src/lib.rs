// Core layer - shared types and configuration
pub mod core;

// Features layer - reminders and activity log
pub mod features;

// UI components
pub mod message_components;

// Application layer
pub mod command_handler;
pub mod commands;

pub use core::Config;

pub use features::{
    // Activity
    ActivityLog, ActivityStatus, CompletionStats,
    // Reminders
    DiscordNotifier, ReminderScheduler, ReminderStore, SchedulerController, SchedulerState,
};
