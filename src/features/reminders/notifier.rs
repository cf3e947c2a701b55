//! Reminder delivery
//!
//! The scheduler only sees the `Notifier` trait. `DiscordNotifier` posts the
//! reminder to its channel with Done/Skip buttons and falls back to warning
//! the owner by DM when the channel cannot be reached.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Only a missing or forbidden channel counts as unavailable
//! - 1.1.0: DM the owner when the reminder channel is gone
//! - 1.0.0: Initial channel delivery with completion buttons

use crate::core::response::{truncate_chars, EMBED_TITLE_LIMIT};
use crate::core::DeliveryError;
use async_trait::async_trait;
use log::{info, warn};
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::http::Http;
use serenity::model::application::component::ButtonStyle;
use serenity::model::id::{ChannelId, UserId};
use std::sync::Arc;

const DONE_PREFIX: &str = "reminder_done:";
const SKIP_PREFIX: &str = "reminder_skip:";
const REMINDER_COLOR: u32 = 0xF1C40F;

/// A notification that was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryHandle {
    pub channel_id: u64,
    pub message_id: u64,
}

/// Delivery transport used by the scheduler
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(
        &self,
        channel_id: u64,
        owner_id: &str,
        title: &str,
        checklist: &[String],
    ) -> Result<DeliveryHandle, DeliveryError>;
}

/// Done/Skip button press on a delivered reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionAction {
    Done { owner_id: String },
    Skip { owner_id: String },
}

impl CompletionAction {
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        if let Some(owner) = custom_id.strip_prefix(DONE_PREFIX) {
            return Some(Self::Done {
                owner_id: owner.to_string(),
            });
        }
        custom_id.strip_prefix(SKIP_PREFIX).map(|owner| Self::Skip {
            owner_id: owner.to_string(),
        })
    }

    pub fn owner_id(&self) -> &str {
        match self {
            Self::Done { owner_id } | Self::Skip { owner_id } => owner_id,
        }
    }
}

/// Embed carrying the reminder title and its checklist
pub fn reminder_embed(title: &str, checklist: &[String]) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title(truncate_chars(title, EMBED_TITLE_LIMIT));
    embed.color(REMINDER_COLOR);
    if !checklist.is_empty() {
        embed.description(format_checklist(checklist));
    }
    embed
}

pub fn format_checklist(checklist: &[String]) -> String {
    checklist
        .iter()
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Done/Skip row attached to every delivered reminder
pub fn reminder_buttons(owner_id: &str, disabled: bool) -> CreateComponents {
    CreateComponents::default()
        .create_action_row(|row| {
            row.create_button(|button| {
                button
                    .custom_id(format!("{DONE_PREFIX}{owner_id}"))
                    .label("✅ Done")
                    .style(ButtonStyle::Success)
                    .disabled(disabled)
            })
            .create_button(|button| {
                button
                    .custom_id(format!("{SKIP_PREFIX}{owner_id}"))
                    .label("❌ Skip")
                    .style(ButtonStyle::Danger)
                    .disabled(disabled)
            })
        })
        .to_owned()
}

/// HTTP status of a failed Discord request, if it got that far
fn http_status(error: &serenity::Error) -> Option<u16> {
    match error {
        serenity::Error::Http(http) => http.status_code().map(|status| status.as_u16()),
        _ => None,
    }
}

/// 403 and 404 mean the channel is gone or closed to the bot; anything
/// else is a Discord failure that may pass on the next occurrence
fn classify_send_error(channel_id: u64, status: Option<u16>, reason: String) -> DeliveryError {
    match status {
        Some(403 | 404) => DeliveryError::ChannelUnavailable { channel_id, reason },
        _ => DeliveryError::Discord(reason),
    }
}

/// Sends reminders through the Discord HTTP API
pub struct DiscordNotifier {
    http: Arc<Http>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Best-effort DM telling the owner their reminder could not be posted
    async fn warn_owner(&self, owner_id: &str, title: &str) {
        let Ok(user_id) = owner_id.parse::<u64>() else {
            return;
        };
        let http: &Http = &self.http;
        let dm = match UserId(user_id).create_dm_channel(http).await {
            Ok(dm) => dm,
            Err(e) => {
                warn!("Could not open DM with user {owner_id}: {e}");
                return;
            }
        };

        if let Err(e) = dm
            .send_message(http, |m| {
                m.content(format!("⚠️ Reminder failed: channel missing for `{title}`"))
            })
            .await
        {
            warn!("Could not warn user {owner_id} about failed reminder: {e}");
        }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn deliver(
        &self,
        channel_id: u64,
        owner_id: &str,
        title: &str,
        checklist: &[String],
    ) -> Result<DeliveryHandle, DeliveryError> {
        let content = match owner_id.parse::<u64>() {
            Ok(id) => format!("🔔 <@{id}>"),
            Err(_) => "🔔".to_string(),
        };
        let embed = reminder_embed(title, checklist);
        let buttons = reminder_buttons(owner_id, false);

        let sent = ChannelId(channel_id)
            .send_message(&self.http, |m| {
                m.content(content).set_embed(embed).set_components(buttons)
            })
            .await;

        match sent {
            Ok(message) => {
                info!("Delivered reminder '{title}' for user {owner_id} to channel {channel_id}");
                Ok(DeliveryHandle {
                    channel_id,
                    message_id: message.id.0,
                })
            }
            Err(e) => {
                let error = classify_send_error(channel_id, http_status(&e), e.to_string());
                if matches!(error, DeliveryError::ChannelUnavailable { .. }) {
                    self.warn_owner(owner_id, title).await;
                }
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_action_parsing() {
        assert_eq!(
            CompletionAction::from_custom_id("reminder_done:123"),
            Some(CompletionAction::Done {
                owner_id: "123".to_string()
            })
        );
        let skip = CompletionAction::from_custom_id("reminder_skip:456").unwrap();
        assert_eq!(skip.owner_id(), "456");
        assert_eq!(CompletionAction::from_custom_id("unrelated_button"), None);
    }

    #[test]
    fn test_send_errors_are_classified_by_status() {
        for status in [403, 404] {
            assert!(matches!(
                classify_send_error(9, Some(status), "gone".to_string()),
                DeliveryError::ChannelUnavailable { channel_id: 9, .. }
            ));
        }
        assert!(matches!(
            classify_send_error(9, Some(500), "bad gateway".to_string()),
            DeliveryError::Discord(reason) if reason == "bad gateway"
        ));
        assert!(matches!(
            classify_send_error(9, None, "connection reset".to_string()),
            DeliveryError::Discord(_)
        ));
    }

    #[test]
    fn test_format_checklist() {
        let items = vec!["Water".to_string(), "Stretch".to_string()];
        assert_eq!(format_checklist(&items), "• Water\n• Stretch");
        assert_eq!(format_checklist(&[]), "");
    }

    #[test]
    fn test_reminder_embed_fields() {
        let embed = reminder_embed("Standup", &["Notes".to_string()]);
        assert_eq!(embed.0.get("title").and_then(|v| v.as_str()), Some("Standup"));
        assert_eq!(
            embed.0.get("description").and_then(|v| v.as_str()),
            Some("• Notes")
        );

        let bare = reminder_embed("Standup", &[]);
        assert!(bare.0.get("description").is_none());
    }

    #[test]
    fn test_reminder_buttons_carry_owner() {
        let components = reminder_buttons("77", false);
        assert_eq!(components.0.len(), 1);
        let row = components.0[0].to_string();
        assert!(row.contains("reminder_done:77"));
        assert!(row.contains("reminder_skip:77"));
    }
}
