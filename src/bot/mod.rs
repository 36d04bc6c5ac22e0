//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `StockBuddy` application,
//! including all slash commands, autocomplete handlers, the cart text parser and
//! bot context management. It resolves the operator for each invocation and
//! hands everything else to the core.

/// Cart text parsing for `/sell`
pub mod cart_input;
/// Discord command implementations (stock, sale, transaction, analytics, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::{shop::ShopSettings, staff::StaffDirectory},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Shared data available to all bot commands.
/// This structure holds the database connection, the staff directory that maps
/// Discord users to operators, and the shop settings.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Registered staff
    pub staff: StaffDirectory,
    /// Shop settings from config.toml
    pub shop: ShopSettings,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(database: DatabaseConnection, staff: StaffDirectory, shop: ShopSettings) -> Self {
        Self {
            database,
            staff,
            shop,
        }
    }

    /// Operator username registered for a Discord user id.
    #[must_use]
    pub fn operator_for(&self, discord_id: &str) -> Option<&str> {
        self.staff.operator_for(discord_id)
    }
}

/// Resolves the operator behind `ctx`, replying with a refusal when the author
/// is not registered staff.
pub async fn require_operator(ctx: Context<'_>) -> Result<Option<String>> {
    let discord_id = ctx.author().id.to_string();
    if let Some(operator) = ctx.data().operator_for(&discord_id) {
        return Ok(Some(operator.to_string()));
    }

    warn!(discord_id, user = %ctx.author().name, "Refused command from unregistered user");
    ctx.say("❌ You are not registered as staff for this shop.")
        .await?;
    Ok(None)
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let message = if error.is_user_error() {
                format!("❌ {error}")
            } else {
                error!("Error in command `{}`: {:?}", ctx.command().name, error);
                "❌ Something went wrong. Please try again later.".to_string()
            };
            if let Err(e) = ctx.say(message).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the poise framework and runs the Discord client until it stops.
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::categories(),
                commands::stock(),
                commands::sell(),
                commands::history(),
                commands::receipt(),
                commands::void(),
                commands::analytics(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
