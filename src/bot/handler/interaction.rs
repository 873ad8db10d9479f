//! Interaction handler for slash commands and button presses.
//!
//! Commands that open games and all button presses go through the game service.
//! Balance, history and grants go through the economy service. Refusals are sent as
//! ephemeral messages to the acting user only; public game state is updated in
//! place on the message that carries the buttons.

use sea_orm::{DatabaseConnection, DbErr};
use serenity::all::{
    CommandInteraction, ComponentInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseMessage, Interaction,
};
use std::sync::Arc;

use crate::{
    bot::{
        command::{self, SlashCommand},
        custom_id,
        notifier::DiscordExpiryNotifier,
        render,
    },
    data::account::DatabaseLedger,
    error::game::{ErrorCategory, GameError},
    model::{
        account::{BalanceDelta, LedgerCommit},
        game::{ActionContext, GameAction, GameReply},
    },
    service::{
        economy::EconomyService,
        game::{GameService, GameState},
    },
};

const GUILD_ONLY: &str = "Wagers only work inside a server.";
const BANK_UNAVAILABLE: &str = "The bank is unavailable right now, please try again.";

/// Handles an interaction of any kind.
///
/// # Arguments
/// - `db` - Database connection backing the ledger
/// - `games` - Shared registries of pending games
/// - `ctx` - Discord context for responding
/// - `interaction` - The incoming interaction
pub async fn handle_interaction(
    db: &DatabaseConnection,
    games: &GameState,
    ctx: Context,
    interaction: Interaction,
) {
    match interaction {
        Interaction::Command(cmd) => handle_command(db, games, &ctx, &cmd).await,
        Interaction::Component(component) => {
            handle_component(db, games, &ctx, &component).await
        }
        _ => {}
    }
}

async fn handle_command(
    db: &DatabaseConnection,
    games: &GameState,
    ctx: &Context,
    cmd: &CommandInteraction,
) {
    let response = match (cmd.guild_id, command::parse(cmd)) {
        (None, _) => render::notice_message(GUILD_ONLY),
        (Some(_), None) => {
            tracing::warn!("Received unknown command /{}", cmd.data.name);
            render::unknown_command_message()
        }
        (Some(guild_id), Some(SlashCommand::Play(action))) => {
            let action_ctx = ActionContext {
                guild_id: guild_id.get(),
                channel_id: cmd.channel_id.get(),
                actor_id: cmd.user.id.get(),
            };
            match play(db, games, ctx, &action_ctx, action).await {
                Ok(reply) => render::reply_message(&reply),
                Err(e) => render::error_message(&e),
            }
        }
        (Some(guild_id), Some(SlashCommand::Balance { user_id })) => {
            balance(db, guild_id.get(), user_id.unwrap_or(cmd.user.id.get())).await
        }
        (Some(guild_id), Some(SlashCommand::Wagers { user_id })) => {
            wagers(db, guild_id.get(), user_id.unwrap_or(cmd.user.id.get())).await
        }
        (Some(guild_id), Some(SlashCommand::Grant { user_id, amount })) => {
            grant(db, cmd, guild_id.get(), user_id, amount).await
        }
    };

    if let Err(e) = cmd
        .create_response(&ctx.http, CreateInteractionResponse::Message(response))
        .await
    {
        tracing::error!("Failed to respond to /{}: {:?}", cmd.data.name, e);
    }
}

async fn handle_component(
    db: &DatabaseConnection,
    games: &GameState,
    ctx: &Context,
    component: &ComponentInteraction,
) {
    let Some(action) = custom_id::decode(&component.data.custom_id) else {
        tracing::debug!("Ignoring component {}", component.data.custom_id);
        return;
    };

    let response = match component.guild_id {
        None => CreateInteractionResponse::Message(render::notice_message(GUILD_ONLY)),
        Some(guild_id) => {
            let action_ctx = ActionContext {
                guild_id: guild_id.get(),
                channel_id: component.channel_id.get(),
                actor_id: component.user.id.get(),
            };
            match play(db, games, ctx, &action_ctx, action).await {
                Ok(GameReply::AlreadySettled) => CreateInteractionResponse::Message(
                    render::reply_message(&GameReply::AlreadySettled),
                ),
                Ok(reply) => CreateInteractionResponse::UpdateMessage(render::reply_message(&reply)),
                Err(e) => CreateInteractionResponse::Message(render::error_message(&e)),
            }
        }
    };

    if let Err(e) = component.create_response(&ctx.http, response).await {
        tracing::error!(
            "Failed to respond to component {}: {:?}",
            component.data.custom_id,
            e
        );
    }
}

/// Runs a game action against the database ledger.
async fn play(
    db: &DatabaseConnection,
    games: &GameState,
    ctx: &Context,
    action_ctx: &ActionContext,
    action: GameAction,
) -> Result<GameReply, GameError> {
    let ledger = Arc::new(DatabaseLedger::new(db.clone()));
    let notifier = Arc::new(DiscordExpiryNotifier::new(ctx.http.clone()));
    let service = GameService::new(ledger, games, notifier);

    let result = service.handle(action_ctx, action).await;

    if let Err(e) = &result {
        match e.category() {
            ErrorCategory::LedgerUnavailable => {
                tracing::error!("Game action by {} failed: {:?}", action_ctx.actor_id, e)
            }
            _ => tracing::debug!("Game action by {} refused: {}", action_ctx.actor_id, e),
        }
    }

    result
}

async fn balance(
    db: &DatabaseConnection,
    guild_id: u64,
    user_id: u64,
) -> CreateInteractionResponseMessage {
    match EconomyService::new(db).balance(guild_id, user_id).await {
        Ok(balance) => CreateInteractionResponseMessage::new()
            .embed(render::balance_embed(user_id, balance)),
        Err(e) => bank_unavailable("balance", e),
    }
}

async fn wagers(
    db: &DatabaseConnection,
    guild_id: u64,
    user_id: u64,
) -> CreateInteractionResponseMessage {
    match EconomyService::new(db).recent_wagers(guild_id, user_id).await {
        Ok(records) => CreateInteractionResponseMessage::new()
            .embed(render::wagers_embed(user_id, &records)),
        Err(e) => bank_unavailable("wagers", e),
    }
}

async fn grant(
    db: &DatabaseConnection,
    cmd: &CommandInteraction,
    guild_id: u64,
    user_id: u64,
    amount: i64,
) -> CreateInteractionResponseMessage {
    if !can_manage_economy(cmd) {
        return render::notice_message("You need the Manage Server permission for that.");
    }

    match EconomyService::new(db)
        .grant(guild_id, user_id, BalanceDelta::cash(amount))
        .await
    {
        Ok(LedgerCommit::Applied(balances)) => {
            let balance = balances
                .first()
                .map(|(_, balance)| *balance)
                .unwrap_or_default();
            render::notice_message(&render::grant_text(user_id, amount, balance))
        }
        Ok(LedgerCommit::Insufficient(shortfall)) => {
            render::notice_message(&render::grant_refused_text(&shortfall))
        }
        Err(e) => bank_unavailable("economy grant", e),
    }
}

fn bank_unavailable(command: &str, e: DbErr) -> CreateInteractionResponseMessage {
    tracing::error!("Economy command /{} failed: {:?}", command, e);
    render::notice_message(BANK_UNAVAILABLE)
}

/// The invoking member must hold Manage Server; per-role command overrides can
/// expose the command to others.
fn can_manage_economy(cmd: &CommandInteraction) -> bool {
    cmd.member
        .as_ref()
        .and_then(|member| member.permissions)
        .is_some_and(|permissions| permissions.manage_guild())
}
