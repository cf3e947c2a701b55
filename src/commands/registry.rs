//! Command handler registry
//!
//! - **Version**: 1.2.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 1.2.0: Lookup-only surface; the dispatcher never enumerates commands
//! - 1.1.0: Registry built from the reminder and stats handlers
//! - 1.0.0: Initial implementation for handler dispatch

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Slash command name to the handler that answers it
///
/// One handler may answer several names (the reminder handler owns all four
/// reminder commands). Registering a name twice keeps the later handler.
///
/// ```ignore
/// let registry = CommandRegistry::with_default_handlers();
/// if let Some(handler) = registry.get("listreminders") {
///     handler.handle(ctx, serenity_ctx, command).await?;
/// }
/// ```
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn SlashCommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the reminder and stats handlers
    pub fn with_default_handlers() -> Self {
        let mut registry = Self::new();
        for handler in super::handlers::create_all_handlers() {
            registry.register(handler);
        }
        registry
    }

    /// Register `handler` under every name it declares
    pub fn register(&mut self, handler: Arc<dyn SlashCommandHandler>) {
        for name in handler.command_names() {
            self.handlers.insert(name, Arc::clone(&handler));
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SlashCommandHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}
