//! Reminder form input
//!
//! Free text from the create/edit modals. Everything except the repeat days
//! is checked on modal submit; the days arrive later from a select menu.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0

use crate::core::ValidationError;
use crate::features::reminders::model::{DaySet, ReminderDefinition, ReminderRecord, TimeOfDay};

/// Raw values of the reminder modal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderForm {
    pub title: String,
    pub time: String,
    pub checklist: String,
    pub lead: String,
}

impl ReminderForm {
    /// Prefill values for editing an existing record
    pub fn from_record(record: &ReminderRecord) -> Self {
        Self {
            title: record.title.clone(),
            time: record.time.clone(),
            checklist: record.checklist.join(", "),
            lead: record.delay.max(0).to_string(),
        }
    }

    pub fn validate(&self) -> Result<PendingReminder, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(PendingReminder {
            title: title.to_string(),
            time: TimeOfDay::parse(&self.time)?,
            checklist: parse_checklist(&self.checklist),
            lead_minutes: parse_lead(&self.lead),
        })
    }
}

/// A validated form still waiting for its repeat days
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReminder {
    pub title: String,
    pub time: TimeOfDay,
    pub checklist: Vec<String>,
    pub lead_minutes: u32,
}

impl PendingReminder {
    pub fn with_days(
        self,
        days: DaySet,
        channel_id: u64,
    ) -> Result<ReminderDefinition, ValidationError> {
        ReminderDefinition::new(
            self.title,
            self.time,
            self.checklist,
            self.lead_minutes,
            days,
            channel_id,
        )
    }
}

/// `none` or blank means no checklist; otherwise comma separated items
pub fn parse_checklist(input: &str) -> Vec<String> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lead minutes; anything that is not a plain number counts as 0
pub fn parse_lead(input: &str) -> u32 {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    input.parse().unwrap_or(u32::MAX)
}
