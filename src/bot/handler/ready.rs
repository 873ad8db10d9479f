//! Ready event handler.
//!
//! Logs the connection and (re)registers the slash commands. With a command guild
//! configured the commands are set on that guild only, which applies instantly;
//! otherwise they are registered globally.

use serenity::all::{Command, Context, GuildId, Ready};

use crate::bot::command;

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `ctx` - Discord context used for command registration
/// - `ready` - Ready event data containing bot user information
/// - `command_guild_id` - Guild to register commands in, or `None` for global
pub async fn handle_ready(ctx: Context, ready: Ready, command_guild_id: Option<u64>) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    let result = match command_guild_id {
        Some(guild_id) => GuildId::new(guild_id)
            .set_commands(&ctx.http, command::definitions())
            .await,
        None => Command::set_global_commands(&ctx.http, command::definitions()).await,
    };

    match result {
        Ok(commands) => tracing::info!("Registered {} slash commands", commands.len()),
        Err(e) => tracing::error!("Failed to register slash commands: {:?}", e),
    }
}
