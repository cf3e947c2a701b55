//! Due-set resolution
//!
//! Pure functions: given a minute of the week and the full dataset, work out
//! which reminders fire now. Matching is exact; a minute nobody looked at is
//! never caught up on.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use crate::core::ValidationError;
use crate::features::reminders::model::{MinuteOfWeek, ReminderDataset, ReminderDefinition};
use log::warn;

/// A reminder occurrence to deliver this minute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueReminder {
    pub owner_id: String,
    /// Position in the owner's list at load time
    pub index: usize,
    pub reminder: ReminderDefinition,
}

/// A stored record that could not be scheduled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecord {
    pub owner_id: String,
    pub index: usize,
    pub error: ValidationError,
}

/// Outcome of resolving one minute against the dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub due: Vec<DueReminder>,
    pub invalid: Vec<InvalidRecord>,
}

/// Resolve the due set and collect every record that failed validation
///
/// Output follows dataset order: owners in key order, then each owner's list order.
pub fn resolve_due_with_errors(now: MinuteOfWeek, dataset: &ReminderDataset) -> Resolution {
    let mut resolution = Resolution::default();

    for (owner_id, records) in dataset {
        for (index, record) in records.iter().enumerate() {
            match record.validate() {
                Ok(reminder) if reminder.is_due_at(now) => resolution.due.push(DueReminder {
                    owner_id: owner_id.clone(),
                    index,
                    reminder,
                }),
                Ok(_) => {}
                Err(error) => resolution.invalid.push(InvalidRecord {
                    owner_id: owner_id.clone(),
                    index,
                    error,
                }),
            }
        }
    }

    resolution
}

/// Resolve the due set, logging and skipping invalid records
pub fn resolve_due(now: MinuteOfWeek, dataset: &ReminderDataset) -> Vec<DueReminder> {
    let resolution = resolve_due_with_errors(now, dataset);
    log_invalid(&resolution.invalid);
    resolution.due
}

pub fn log_invalid(invalid: &[InvalidRecord]) {
    for record in invalid {
        warn!(
            "Skipping reminder #{} for user {}: {}",
            record.index, record.owner_id, record.error
        );
    }
}
