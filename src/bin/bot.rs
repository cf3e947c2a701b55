use anyhow::{Context as _, Result};
use dotenvy::dotenv;
use log::{debug, error, info, warn};
use serenity::async_trait;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use remindbot::commands::{
    register_global_commands, register_guild_commands, CommandContext, CommandHandler,
};
use remindbot::core::{Config, LifecycleError};
use remindbot::features::activity::ActivityLog;
use remindbot::features::reminders::{
    DiscordNotifier, ReminderScheduler, ReminderStore, SchedulerController,
};
use remindbot::message_components::MessageComponentHandler;

struct Handler {
    command_handler: Arc<CommandHandler>,
    component_handler: Arc<MessageComponentHandler>,
    guild_id: Option<GuildId>,
    scheduler: Arc<SchedulerController>,
    store: ReminderStore,
    delivery_timeout: Duration,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        let registered = match self.guild_id {
            Some(guild_id) => register_guild_commands(&ctx, guild_id).await,
            None => register_global_commands(&ctx).await,
        };
        if let Err(e) = registered {
            error!("Failed to register slash commands: {e}");
        }

        let notifier = Arc::new(DiscordNotifier::new(ctx.http.clone()));
        let scheduler = ReminderScheduler::new(self.store.clone(), notifier)
            .with_delivery_timeout(self.delivery_timeout);
        match self.scheduler.start(scheduler).await {
            Ok(()) => info!("⏰ Reminder scheduler running on {}", self.store.path().display()),
            Err(LifecycleError::AlreadyRunning) => {
                debug!("Reminder scheduler already running, ignoring repeated ready")
            }
            Err(e) => error!("Failed to start reminder scheduler: {e}"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                if let Err(e) = self
                    .command_handler
                    .handle_slash_command(&ctx, &command)
                    .await
                {
                    error!(
                        "Error handling slash command '{}': {}",
                        command.data.name, e
                    );

                    let error_message =
                        "❌ Sorry, I encountered an error processing your command. Please try again.";

                    // The handler may already have answered; fall back to a follow-up
                    if command
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message.content(error_message).ephemeral(true)
                                })
                        })
                        .await
                        .is_err()
                    {
                        let _ = command
                            .create_followup_message(&ctx.http, |followup| {
                                followup.content(error_message).ephemeral(true)
                            })
                            .await;
                    }
                }
            }
            Interaction::MessageComponent(component) => {
                if let Err(e) = self
                    .component_handler
                    .handle_component_interaction(&ctx, &component)
                    .await
                {
                    error!(
                        "Error handling component interaction '{}': {}",
                        component.data.custom_id, e
                    );

                    let error_message =
                        "❌ Sorry, I encountered an error processing your interaction. Please try again.";

                    if component
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message.content(error_message).ephemeral(true)
                                })
                        })
                        .await
                        .is_err()
                    {
                        let _ = component
                            .create_followup_message(&ctx.http, |followup| {
                                followup.content(error_message).ephemeral(true)
                            })
                            .await;
                    }
                }
            }
            Interaction::ModalSubmit(modal) => {
                if let Err(e) = self
                    .component_handler
                    .handle_modal_submit(&ctx, &modal)
                    .await
                {
                    error!(
                        "Error handling modal submit '{}': {}",
                        modal.data.custom_id, e
                    );

                    let error_message =
                        "❌ Sorry, I encountered an error processing your submission. Please try again.";

                    if modal
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message.content(error_message).ephemeral(true)
                                })
                        })
                        .await
                        .is_err()
                    {
                        let _ = modal
                            .create_followup_message(&ctx.http, |followup| {
                                followup.content(error_message).ephemeral(true)
                            })
                            .await;
                    }
                }
            }
            Interaction::Ping(_) => {
                info!("Ping interaction received - Discord health check");
            }
            other => {
                debug!("Ignoring interaction of kind {:?}", other.kind());
            }
        }
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.log_level),
    );

    if let Some(path) = &config.log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;
    init_logging(&config)?;

    info!("Starting reminder bot...");

    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("Failed to create data dir {}", config.data_dir.display()))?;

    let store = ReminderStore::new(&config.reminders_path);
    match store.load().await {
        Ok(dataset) => info!(
            "📄 Loaded reminders for {} users from {}",
            dataset.len(),
            store.path().display()
        ),
        // The scheduler keeps retrying every minute; a bad file is not fatal
        Err(e) => warn!("Reminder store is not readable yet: {e}"),
    }

    let activity = ActivityLog::new(&config.activity_dir);
    let context = Arc::new(CommandContext::new(store.clone(), activity));
    let command_handler = CommandHandler::new(Arc::clone(&context));
    let component_handler = MessageComponentHandler::new(context);

    // Parse guild ID if provided for development mode
    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let scheduler = Arc::new(SchedulerController::new());

    let handler = Handler {
        command_handler: Arc::new(command_handler),
        component_handler: Arc::new(component_handler),
        guild_id,
        scheduler: Arc::clone(&scheduler),
        store,
        delivery_timeout: config.delivery_timeout,
    };

    let intents = GatewayIntents::GUILDS;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
            return;
        }
        info!("Shutdown requested, stopping reminder scheduler...");
        if let Err(e) = scheduler.stop().await {
            debug!("Reminder scheduler was not running: {e}");
        }
        shard_manager.lock().await.shutdown_all().await;
    });

    info!("Establishing WebSocket connection to Discord gateway...");
    info!("Gateway intents: {intents:?}");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    info!("Reminder bot stopped");
    Ok(())
}
