//! # Activity Feature
//!
//! Done/Skip outcomes of delivered reminders and the completion stats built
//! from them.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0
//! - **Toggleable**: false

pub mod ledger;

pub use ledger::{ActivityEntry, ActivityLog, ActivityStatus, CompletionStats};
