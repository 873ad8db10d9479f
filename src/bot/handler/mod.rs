use sea_orm::DatabaseConnection;
use serenity::all::{Context, EventHandler, Interaction, Ready};
use serenity::async_trait;

use crate::service::game::GameState;

pub mod interaction;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub db: DatabaseConnection,
    /// Pending challenges and tables, shared by every interaction.
    pub games: GameState,
    pub command_guild_id: Option<u64>,
}

impl Handler {
    pub fn new(db: DatabaseConnection, command_guild_id: Option<u64>) -> Self {
        Self {
            db,
            games: GameState::new(),
            command_guild_id,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready, self.command_guild_id).await;
    }

    /// Called for slash commands and button presses
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction(&self.db, &self.games, ctx, interaction).await;
    }
}
