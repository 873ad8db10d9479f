//! Wager log factory for seeding settled wager history.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating wager log rows.
///
/// Defaults to a dice duel in guild `"1"` won by the challenger.
pub struct WagerLogFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    game: String,
    challenger_id: String,
    opponent_id: Option<String>,
    stake: i64,
    payout: i64,
    outcome: String,
    winner_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl<'a> WagerLogFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, challenger_id: impl Into<String>) -> Self {
        let challenger_id = challenger_id.into();
        Self {
            db,
            guild_id: "1".to_string(),
            game: "dice".to_string(),
            winner_id: Some(challenger_id.clone()),
            challenger_id,
            opponent_id: None,
            stake: 10,
            payout: 10,
            outcome: "win".to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    pub fn game(mut self, game: impl Into<String>) -> Self {
        self.game = game.into();
        self
    }

    pub fn opponent_id(mut self, opponent_id: impl Into<String>) -> Self {
        self.opponent_id = Some(opponent_id.into());
        self
    }

    /// Sets the stake; the payout follows it for an even-money win.
    pub fn stake(mut self, stake: i64) -> Self {
        self.stake = stake;
        self.payout = stake;
        self
    }

    pub fn payout(mut self, payout: i64) -> Self {
        self.payout = payout;
        self
    }

    pub fn outcome(mut self, outcome: impl Into<String>, winner_id: Option<String>) -> Self {
        self.outcome = outcome.into();
        self.winner_id = winner_id;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builds and inserts the wager log entity into the database.
    pub async fn build(self) -> Result<entity::wager_log::Model, DbErr> {
        entity::wager_log::ActiveModel {
            guild_id: ActiveValue::Set(self.guild_id),
            game: ActiveValue::Set(self.game),
            challenger_id: ActiveValue::Set(self.challenger_id),
            opponent_id: ActiveValue::Set(self.opponent_id),
            stake: ActiveValue::Set(self.stake),
            payout: ActiveValue::Set(self.payout),
            outcome: ActiveValue::Set(self.outcome),
            winner_id: ActiveValue::Set(self.winner_id),
            created_at: ActiveValue::Set(self.created_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a default wager log row for `challenger_id` in `guild_id`.
pub async fn create_wager_log(
    db: &DatabaseConnection,
    guild_id: impl Into<String>,
    challenger_id: impl Into<String>,
) -> Result<entity::wager_log::Model, DbErr> {
    WagerLogFactory::new(db, challenger_id)
        .guild_id(guild_id)
        .build()
        .await
}
