//! Completion stats handler
//!
//! Handles: stats
//!
//! - **Version**: 1.0.0
//! - **Since**: 4.0.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;

pub struct StatsHandler;

#[async_trait]
impl SlashCommandHandler for StatsHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["stats"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let stats = ctx.activity.stats(&user_id).await?;
        info!(
            "Stats for user {user_id}: {} done, {} skipped",
            stats.done, stats.skipped
        );

        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message.content(stats.summary()).ephemeral(true)
                    })
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_handler_commands() {
        assert_eq!(StatsHandler.command_names(), &["stats"]);
    }
}
