//! Slash command handler trait
//!
//! - **Version**: 1.2.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 1.2.0: Documented the initial-response contract
//! - 1.1.0: Handlers receive the reminder command context
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::context::CommandContext;

/// Answers one or more slash commands
///
/// A handler must send the interaction's initial response itself. Returning
/// `Err` lets the dispatcher reply with a generic ephemeral error instead, so
/// handlers only propagate failures they have not already shown the user.
///
/// ```ignore
/// #[async_trait]
/// impl SlashCommandHandler for StatsHandler {
///     fn command_names(&self) -> &'static [&'static str] {
///         &["stats"]
///     }
///
///     async fn handle(&self, ctx: Arc<CommandContext>, serenity_ctx: &Context,
///                     command: &ApplicationCommandInteraction) -> Result<()> {
///         let stats = ctx.activity.stats(&command.user.id.to_string()).await?;
///         // reply ephemerally with stats.summary()
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait SlashCommandHandler: Send + Sync {
    /// Names this handler is registered under
    fn command_names(&self) -> &'static [&'static str];

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()>;
}
