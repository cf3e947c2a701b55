//! # Command Dispatch
//!
//! Routes slash command interactions to the handler registered for the
//! command name.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Registry-only dispatch over the reminder command context
//! - 1.0.0: Monolithic command handling

use crate::commands::{CommandContext, CommandRegistry};
use anyhow::Result;
use log::{debug, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct CommandHandler {
    registry: CommandRegistry,
    context: Arc<CommandContext>,
}

impl CommandHandler {
    pub fn new(context: Arc<CommandContext>) -> Self {
        Self::with_registry(CommandRegistry::with_default_handlers(), context)
    }

    pub fn with_registry(registry: CommandRegistry, context: Arc<CommandContext>) -> Self {
        Self { registry, context }
    }

    pub fn context(&self) -> Arc<CommandContext> {
        Arc::clone(&self.context)
    }

    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let user_id = command.user.id.to_string();
        let guild_id = command
            .guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "DM".to_string());

        info!(
            "[{request_id}] 📥 Slash command received | Command: {} | User: {user_id} | Channel: {} | Guild: {guild_id}",
            command.data.name, command.channel_id
        );

        let Some(handler) = self.registry.get(&command.data.name) else {
            warn!("[{request_id}] No handler registered for /{}", command.data.name);
            command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message.content("Unknown command.").ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        };

        handler.handle(self.context(), ctx, command).await?;
        debug!("[{request_id}] ✅ /{} completed", command.data.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::activity::ActivityLog;
    use crate::features::reminders::ReminderStore;

    #[test]
    fn test_command_handler_uses_default_registry() {
        let context = Arc::new(CommandContext::new(
            ReminderStore::new("reminders.json"),
            ActivityLog::new("logs"),
        ));
        let handler = CommandHandler::new(context);
        for name in [
            "createreminder",
            "listreminders",
            "editreminder",
            "deletereminder",
            "stats",
        ] {
            assert!(handler.registry.contains(name), "/{name} is not routed");
        }
    }
}
