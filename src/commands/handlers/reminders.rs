//! Reminder command handlers
//!
//! Handles: createreminder, listreminders, editreminder, deletereminder
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Weekly reminders driven by modals and select menus
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::core::chunk_for_message;
use crate::features::reminders::{ReminderForm, ReminderRecord};
use crate::message_components::{
    MessageComponentHandler, CREATE_MODAL_ID, DELETE_PICK_ID, EDIT_PICK_ID, SELECT_OPTION_LIMIT,
};

const EMPTY_LIST_MESSAGE: &str = "📭 No reminders found.";

/// Handler for reminder management commands
pub struct ReminderHandler;

#[async_trait]
impl SlashCommandHandler for ReminderHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &[
            "createreminder",
            "listreminders",
            "editreminder",
            "deletereminder",
        ]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "createreminder" => self.handle_create(serenity_ctx, command).await,
            "listreminders" => self.handle_list(&ctx, serenity_ctx, command).await,
            "editreminder" => {
                self.handle_pick(&ctx, serenity_ctx, command, EDIT_PICK_ID, "Select a reminder to edit")
                    .await
            }
            "deletereminder" => {
                self.handle_pick(
                    &ctx,
                    serenity_ctx,
                    command,
                    DELETE_PICK_ID,
                    "Select a reminder to delete",
                )
                .await
            }
            _ => Ok(()),
        }
    }
}

impl ReminderHandler {
    /// Handle /createreminder - open the empty reminder modal
    async fn handle_create(
        &self,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        debug!("Opening reminder modal for user {}", command.user.id);

        let components =
            MessageComponentHandler::reminder_modal_components(&ReminderForm::default());
        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal
                            .custom_id(CREATE_MODAL_ID)
                            .title("Create a Reminder")
                            .set_components(components)
                    })
            })
            .await?;

        Ok(())
    }

    /// Handle /listreminders - ephemeral list, split across messages when long
    async fn handle_list(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let reminders = ctx.store.reminders_for(&user_id).await?;

        let text = if reminders.is_empty() {
            EMPTY_LIST_MESSAGE.to_string()
        } else {
            Self::format_list(&reminders)
        };
        let mut chunks = chunk_for_message(&text).into_iter();
        let first = chunks.next().unwrap_or_default();

        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| message.content(first).ephemeral(true))
            })
            .await?;

        for chunk in chunks {
            command
                .create_followup_message(&serenity_ctx.http, |followup| {
                    followup.content(chunk).ephemeral(true)
                })
                .await?;
        }

        info!("Listed {} reminders for user {user_id}", reminders.len());
        Ok(())
    }

    /// Handle /editreminder and /deletereminder - show a select of the user's reminders
    async fn handle_pick(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        custom_id: &str,
        prompt: &str,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let reminders = ctx.store.reminders_for(&user_id).await?;

        if reminders.is_empty() {
            command
                .create_interaction_response(&serenity_ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message.content(EMPTY_LIST_MESSAGE).ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        }

        let content = if reminders.len() > SELECT_OPTION_LIMIT {
            format!("{prompt} (showing the first {SELECT_OPTION_LIMIT}):")
        } else {
            format!("{prompt}:")
        };
        let components =
            MessageComponentHandler::reminder_select_menu(custom_id, prompt, &reminders);

        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message
                            .content(content)
                            .set_components(components)
                            .ephemeral(true)
                    })
            })
            .await?;

        Ok(())
    }

    /// One line per reminder, numbered from 1
    pub fn format_list(reminders: &[ReminderRecord]) -> String {
        reminders
            .iter()
            .enumerate()
            .map(|(index, record)| Self::format_line(index + 1, record))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_line(position: usize, record: &ReminderRecord) -> String {
        format!(
            "**#{position} {}** at {} on {} (⏱ {} min early)",
            record.title,
            record.time,
            record.days.join(", "),
            record.delay
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MESSAGE_LIMIT;

    fn record(title: &str, days: &[&str], delay: i64) -> ReminderRecord {
        ReminderRecord {
            title: title.to_string(),
            time: "09:00".to_string(),
            checklist: vec![],
            delay,
            channel_id: Some(1),
            days: days.iter().map(|d| d.to_string()).collect(),
            ..ReminderRecord::default()
        }
    }

    #[test]
    fn test_reminder_handler_commands() {
        let names = ReminderHandler.command_names();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&"createreminder"));
        assert!(names.contains(&"deletereminder"));
    }

    #[test]
    fn test_format_list() {
        let list = ReminderHandler::format_list(&[
            record("Standup", &["Monday", "Friday"], 5),
            record("Stretch", &["Sunday"], 0),
        ]);
        assert_eq!(
            list,
            "**#1 Standup** at 09:00 on Monday, Friday (⏱ 5 min early)\n\
             **#2 Stretch** at 09:00 on Sunday (⏱ 0 min early)"
        );
    }

    #[test]
    fn test_long_list_splits_under_limit() {
        let reminders: Vec<ReminderRecord> = (0..80)
            .map(|i| record(&format!("Reminder number {i}"), &["Monday", "Tuesday"], 10))
            .collect();
        let chunks = chunk_for_message(&ReminderHandler::format_list(&reminders));
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= MESSAGE_LIMIT));
    }
}
