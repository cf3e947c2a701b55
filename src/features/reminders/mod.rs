//! # Reminders Feature
//!
//! Weekly recurring reminders: the persisted model, the JSON store, due-set
//! resolution, delivery and the minute-aligned scheduler loop. Form parsing
//! and drafts back the create/edit flow of the command surface.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Weekly schedules with lead minutes, JSON store, lifecycle controller
//! - 1.0.0: Initial one-shot reminders

pub mod drafts;
pub mod form;
pub mod lifecycle;
pub mod model;
pub mod notifier;
pub mod resolver;
pub mod scheduler;
pub mod store;

pub use drafts::{Draft, DraftBook, DraftTarget};
pub use form::{PendingReminder, ReminderForm};
pub use lifecycle::{SchedulerController, SchedulerHandle, SchedulerState};
pub use model::{
    DaySet, MinuteOfWeek, ReminderDataset, ReminderDefinition, ReminderRecord, TimeOfDay,
};
pub use notifier::{CompletionAction, DeliveryHandle, DiscordNotifier, Notifier};
pub use resolver::{resolve_due, resolve_due_with_errors, DueReminder, InvalidRecord};
pub use scheduler::{Clock, ReminderScheduler, SweepReport, SystemClock};
pub use store::ReminderStore;
