//! # Core Module
//!
//! Configuration, error taxonomy and Discord message helpers shared by every feature.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Add typed error module
//! - 1.1.0: Add response module with message chunking utilities
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod error;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use error::{ActivityError, DeliveryError, LifecycleError, StoreError, ValidationError};
pub use response::{chunk_for_message, truncate_chars, MESSAGE_LIMIT};
