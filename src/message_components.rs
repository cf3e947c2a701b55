//! # Message Components
//!
//! Buttons, select menus and modals of the reminder flow: the create/edit
//! modal, the repeat-day select, the pick lists behind `/editreminder` and
//! `/deletereminder`, and the Done/Skip buttons on delivered reminders.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Reminder modals, day selects and completion buttons
//! - 1.0.0: Initial button and modal handling

use anyhow::Result;
use log::{info, warn};
use serenity::builder::CreateComponents;
use serenity::model::application::component::{ActionRow, ActionRowComponent, InputTextStyle};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::CommandContext;
use crate::core::response::{truncate_chars, SELECT_TEXT_LIMIT};
use crate::core::StoreError;
use crate::features::activity::ActivityStatus;
use crate::features::reminders::model::{weekday_name, WEEKDAYS};
use crate::features::reminders::notifier::{reminder_buttons, CompletionAction};
use crate::features::reminders::{DaySet, DraftTarget, ReminderForm, ReminderRecord};

pub const CREATE_MODAL_ID: &str = "reminder_create_modal";
pub const EDIT_PICK_ID: &str = "reminder_edit_pick";
pub const DELETE_PICK_ID: &str = "reminder_delete_pick";
const EDIT_MODAL_PREFIX: &str = "reminder_edit_modal:";
const DAYS_PREFIX: &str = "reminder_days:";

const FIELD_TITLE: &str = "title";
const FIELD_TIME: &str = "time";
const FIELD_CHECKLIST: &str = "checklist";
const FIELD_LEAD: &str = "lead";

/// Discord caps select menus at 25 options
pub const SELECT_OPTION_LIMIT: usize = 25;

pub const NOT_FOUND_MESSAGE: &str = "⚠️ Reminder not found.";
const DRAFT_EXPIRED_MESSAGE: &str =
    "⌛ This reminder draft has expired. Run the command again to start over.";

/// What a component custom id asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentRoute {
    Completion(CompletionAction),
    Days(Uuid),
    EditPick,
    DeletePick,
    Unknown,
}

impl ComponentRoute {
    pub fn parse(custom_id: &str) -> Self {
        if let Some(action) = CompletionAction::from_custom_id(custom_id) {
            return Self::Completion(action);
        }
        if let Some(id) = custom_id.strip_prefix(DAYS_PREFIX) {
            return Uuid::parse_str(id).map_or(Self::Unknown, Self::Days);
        }
        match custom_id {
            EDIT_PICK_ID => Self::EditPick,
            DELETE_PICK_ID => Self::DeletePick,
            _ => Self::Unknown,
        }
    }
}

/// What a modal custom id asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalRoute {
    Create,
    Edit(usize),
    Unknown,
}

impl ModalRoute {
    pub fn parse(custom_id: &str) -> Self {
        if custom_id == CREATE_MODAL_ID {
            return Self::Create;
        }
        custom_id
            .strip_prefix(EDIT_MODAL_PREFIX)
            .and_then(|index| index.parse().ok())
            .map_or(Self::Unknown, Self::Edit)
    }
}

pub fn edit_modal_id(index: usize) -> String {
    format!("{EDIT_MODAL_PREFIX}{index}")
}

/// Handler for all message component interactions
pub struct MessageComponentHandler {
    context: Arc<CommandContext>,
}

impl MessageComponentHandler {
    pub fn new(context: Arc<CommandContext>) -> Self {
        Self { context }
    }

    /// Handle all types of component interactions
    pub async fn handle_component_interaction(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let custom_id = &interaction.data.custom_id;
        let user_id = interaction.user.id.to_string();

        info!("Processing component interaction: {custom_id} from user: {user_id}");

        match ComponentRoute::parse(custom_id) {
            ComponentRoute::Completion(action) => {
                self.handle_completion(ctx, interaction, action).await
            }
            ComponentRoute::Days(draft_id) => {
                self.handle_day_select(ctx, interaction, draft_id).await
            }
            ComponentRoute::EditPick => self.handle_edit_pick(ctx, interaction).await,
            ComponentRoute::DeletePick => self.handle_delete_pick(ctx, interaction).await,
            ComponentRoute::Unknown => {
                reply_component(ctx, interaction, "Unknown component interaction.").await
            }
        }
    }

    /// Handle modal submit interactions
    pub async fn handle_modal_submit(
        &self,
        ctx: &Context,
        interaction: &ModalSubmitInteraction,
    ) -> Result<()> {
        let custom_id = &interaction.data.custom_id;
        let user_id = interaction.user.id.to_string();

        info!("Processing modal submit: {custom_id} from user: {user_id}");

        let form = Self::form_from_modal(&interaction.data.components);
        match ModalRoute::parse(custom_id) {
            ModalRoute::Create => self.handle_create_modal(ctx, interaction, form).await,
            ModalRoute::Edit(index) => {
                self.handle_edit_modal(ctx, interaction, form, index).await
            }
            ModalRoute::Unknown => {
                reply_modal(ctx, interaction, "Unknown modal submission.").await
            }
        }
    }

    /// Done/Skip on a delivered reminder
    async fn handle_completion(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        action: CompletionAction,
    ) -> Result<()> {
        let owner_id = action.owner_id();
        if interaction.user.id.to_string() != owner_id {
            return reply_component(ctx, interaction, "Not your reminder!").await;
        }

        let task = interaction
            .message
            .embeds
            .first()
            .and_then(|embed| embed.title.clone())
            .unwrap_or_default();
        let (status, reply) = match action {
            CompletionAction::Done { .. } => (ActivityStatus::Done, "✅ Logged as done!"),
            CompletionAction::Skip { .. } => (ActivityStatus::Skipped, "❌ Logged as skipped!"),
        };

        self.context.activity.record(owner_id, &task, status).await?;
        info!("User {owner_id} marked '{task}' as {status:?}");

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::UpdateMessage)
                    .interaction_response_data(|message| {
                        message.set_components(reminder_buttons(owner_id, true))
                    })
            })
            .await?;

        interaction
            .create_followup_message(&ctx.http, |followup| {
                followup.content(reply).ephemeral(true)
            })
            .await?;

        Ok(())
    }

    /// Repeat days picked for a parked draft
    async fn handle_day_select(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        draft_id: Uuid,
    ) -> Result<()> {
        let user_id = interaction.user.id.to_string();
        let Some(draft) = self.context.drafts.take(&draft_id, &user_id) else {
            return update_component(ctx, interaction, DRAFT_EXPIRED_MESSAGE).await;
        };

        let definition = DaySet::parse(&interaction.data.values)
            .and_then(|days| draft.reminder.with_days(days, draft.target.channel_id()));
        let definition = match definition {
            Ok(definition) => definition,
            Err(e) => {
                return update_component(ctx, interaction, format!("❌ {e}")).await;
            }
        };

        let outcome = match draft.target {
            DraftTarget::Create { .. } => self
                .context
                .store
                .append(&user_id, &definition)
                .await
                .map(|index| {
                    info!("Created reminder #{index} '{}' for user {user_id}", definition.title());
                    "✅ Reminder saved!"
                }),
            DraftTarget::Edit { index, .. } => self
                .context
                .store
                .replace(&user_id, index, &definition)
                .await
                .map(|()| {
                    info!("Updated reminder #{index} for user {user_id}");
                    "✅ Reminder updated!"
                }),
        };

        match outcome {
            Ok(message) => update_component(ctx, interaction, message).await,
            Err(StoreError::NotFound { .. }) => {
                update_component(ctx, interaction, NOT_FOUND_MESSAGE).await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// A reminder picked from the `/editreminder` list: open the prefilled modal
    async fn handle_edit_pick(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let user_id = interaction.user.id.to_string();
        let Some(index) = picked_index(&interaction.data.values) else {
            return update_component(ctx, interaction, NOT_FOUND_MESSAGE).await;
        };
        let reminders = self.context.store.reminders_for(&user_id).await?;
        let Some(record) = reminders.get(index) else {
            return update_component(ctx, interaction, NOT_FOUND_MESSAGE).await;
        };

        let components = Self::reminder_modal_components(&ReminderForm::from_record(record));
        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal
                            .custom_id(edit_modal_id(index))
                            .title("Edit Reminder")
                            .set_components(components)
                    })
            })
            .await?;

        Ok(())
    }

    async fn handle_delete_pick(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let user_id = interaction.user.id.to_string();
        let Some(index) = picked_index(&interaction.data.values) else {
            return update_component(ctx, interaction, NOT_FOUND_MESSAGE).await;
        };

        match self.context.store.remove(&user_id, index).await {
            Ok(removed) => {
                info!("Deleted reminder #{index} '{}' for user {user_id}", removed.title);
                update_component(
                    ctx,
                    interaction,
                    format!("🗑️ Deleted reminder **{}**.", removed.title),
                )
                .await
            }
            Err(StoreError::NotFound { .. }) => {
                update_component(ctx, interaction, NOT_FOUND_MESSAGE).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn handle_create_modal(
        &self,
        ctx: &Context,
        interaction: &ModalSubmitInteraction,
        form: ReminderForm,
    ) -> Result<()> {
        let pending = match form.validate() {
            Ok(pending) => pending,
            Err(e) => return reply_modal(ctx, interaction, format!("❌ {e}")).await,
        };

        let user_id = interaction.user.id.to_string();
        let target = DraftTarget::Create {
            channel_id: interaction.channel_id.0,
        };
        let draft_id = self.context.drafts.park(&user_id, pending, target);
        self.send_day_select(ctx, interaction, draft_id, DaySet::empty())
            .await
    }

    async fn handle_edit_modal(
        &self,
        ctx: &Context,
        interaction: &ModalSubmitInteraction,
        form: ReminderForm,
        index: usize,
    ) -> Result<()> {
        let pending = match form.validate() {
            Ok(pending) => pending,
            Err(e) => return reply_modal(ctx, interaction, format!("❌ {e}")).await,
        };

        let user_id = interaction.user.id.to_string();
        let reminders = self.context.store.reminders_for(&user_id).await?;
        let Some(record) = reminders.get(index) else {
            return reply_modal(ctx, interaction, NOT_FOUND_MESSAGE).await;
        };

        let current_days = DaySet::parse(&record.days).unwrap_or_else(|e| {
            warn!("Reminder #{index} of user {user_id} has bad days: {e}");
            DaySet::empty()
        });
        let target = DraftTarget::Edit {
            index,
            channel_id: record.channel_id.unwrap_or(interaction.channel_id.0),
        };
        let draft_id = self.context.drafts.park(&user_id, pending, target);
        self.send_day_select(ctx, interaction, draft_id, current_days)
            .await
    }

    async fn send_day_select(
        &self,
        ctx: &Context,
        interaction: &ModalSubmitInteraction,
        draft_id: Uuid,
        selected: DaySet,
    ) -> Result<()> {
        let components = Self::day_select_menu(&draft_id, selected);
        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message
                            .content("📅 Select the days:")
                            .set_components(components)
                            .ephemeral(true)
                    })
            })
            .await?;
        Ok(())
    }

    /// Title, time, checklist and lead inputs, prefilled from `form`
    pub fn reminder_modal_components(form: &ReminderForm) -> CreateComponents {
        let fields = [
            (FIELD_TITLE, "Reminder Title", InputTextStyle::Short, true, &form.title),
            (FIELD_TIME, "Time (24hr HH:MM)", InputTextStyle::Short, true, &form.time),
            (
                FIELD_CHECKLIST,
                "Checklist (comma separated or 'none')",
                InputTextStyle::Paragraph,
                false,
                &form.checklist,
            ),
            (
                FIELD_LEAD,
                "Reminder Delay (minutes before)",
                InputTextStyle::Short,
                false,
                &form.lead,
            ),
        ];

        let mut components = CreateComponents::default();
        for (id, label, style, required, value) in fields {
            components.create_action_row(|row| {
                row.create_input_text(|input| {
                    input
                        .custom_id(id)
                        .label(label)
                        .style(style)
                        .required(required);
                    if id == FIELD_LEAD {
                        input.placeholder("e.g. 5");
                    }
                    if !value.is_empty() {
                        input.value(value);
                    }
                    input
                })
            });
        }
        components
    }

    /// Multi-select of weekdays for the draft, with `selected` pre-ticked
    pub fn day_select_menu(draft_id: &Uuid, selected: DaySet) -> CreateComponents {
        CreateComponents::default()
            .create_action_row(|row| {
                row.create_select_menu(|menu| {
                    menu.custom_id(format!("{DAYS_PREFIX}{draft_id}"))
                        .placeholder("Pick repeat days")
                        .min_values(1)
                        .max_values(7)
                        .options(|options| {
                            for day in WEEKDAYS {
                                options.create_option(|option| {
                                    option
                                        .label(weekday_name(day))
                                        .value(weekday_name(day))
                                        .default_selection(selected.contains(day))
                                });
                            }
                            options
                        })
                })
            })
            .to_owned()
    }

    /// Single-select of the owner's reminders; option values are list indexes
    pub fn reminder_select_menu(
        custom_id: &str,
        placeholder: &str,
        reminders: &[ReminderRecord],
    ) -> CreateComponents {
        CreateComponents::default()
            .create_action_row(|row| {
                row.create_select_menu(|menu| {
                    menu.custom_id(custom_id)
                        .placeholder(placeholder)
                        .min_values(1)
                        .max_values(1)
                        .options(|options| {
                            for (index, record) in
                                reminders.iter().enumerate().take(SELECT_OPTION_LIMIT)
                            {
                                let label = if record.title.trim().is_empty() {
                                    format!("Reminder #{}", index + 1)
                                } else {
                                    truncate_chars(&record.title, SELECT_TEXT_LIMIT)
                                };
                                let description = truncate_chars(
                                    &format!("{} | {}", record.time, record.days.join(", ")),
                                    SELECT_TEXT_LIMIT,
                                );
                                options.create_option(|option| {
                                    option
                                        .label(label)
                                        .value(index.to_string())
                                        .description(description)
                                });
                            }
                            options
                        })
                })
            })
            .to_owned()
    }

    /// Collect the reminder inputs of a submitted modal
    pub fn form_from_modal(rows: &[ActionRow]) -> ReminderForm {
        let mut form = ReminderForm::default();
        for action_row in rows {
            for component in &action_row.components {
                if let ActionRowComponent::InputText(input) = component {
                    match input.custom_id.as_str() {
                        FIELD_TITLE => form.title = input.value.clone(),
                        FIELD_TIME => form.time = input.value.clone(),
                        FIELD_CHECKLIST => form.checklist = input.value.clone(),
                        FIELD_LEAD => form.lead = input.value.clone(),
                        _ => {}
                    }
                }
            }
        }
        form
    }
}

fn picked_index(values: &[String]) -> Option<usize> {
    values.first().and_then(|value| value.parse().ok())
}

async fn reply_component(
    ctx: &Context,
    interaction: &MessageComponentInteraction,
    content: impl ToString,
) -> Result<()> {
    interaction
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content).ephemeral(true))
        })
        .await?;
    Ok(())
}

/// Replace the (ephemeral) select message with `content` and drop its components
async fn update_component(
    ctx: &Context,
    interaction: &MessageComponentInteraction,
    content: impl ToString,
) -> Result<()> {
    interaction
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::UpdateMessage)
                .interaction_response_data(|message| {
                    message.content(content).components(|c| c) // Clear components
                })
        })
        .await?;
    Ok(())
}

async fn reply_modal(
    ctx: &Context,
    interaction: &ModalSubmitInteraction,
    content: impl ToString,
) -> Result<()> {
    interaction
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content).ephemeral(true))
        })
        .await?;
    Ok(())
}
