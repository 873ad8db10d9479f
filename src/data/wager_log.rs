//! Wager log repository.
//!
//! Rows are created by the ledger inside a settlement transaction, so the repository
//! is generic over the connection it runs on.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::model::wager::{WagerMemo, WagerRecord};

/// Repository providing database operations for settled wager history.
pub struct WagerLogRepository<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> WagerLogRepository<'a, C> {
    /// Creates a new WagerLogRepository on a connection or an open transaction.
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Records a settled wager.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the wager was played in
    /// - `memo` - Participants, stake and outcome of the wager
    /// - `created_at` - Settlement time
    ///
    /// # Returns
    /// - `Ok(WagerRecord)` - The stored record
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(
        &self,
        guild_id: u64,
        memo: &WagerMemo,
        created_at: DateTime<Utc>,
    ) -> Result<WagerRecord, DbErr> {
        let entity = entity::wager_log::ActiveModel {
            guild_id: ActiveValue::Set(guild_id.to_string()),
            game: ActiveValue::Set(memo.game.as_str().to_string()),
            challenger_id: ActiveValue::Set(memo.challenger_id.to_string()),
            opponent_id: ActiveValue::Set(memo.opponent_id.map(|id| id.to_string())),
            stake: ActiveValue::Set(memo.stake),
            payout: ActiveValue::Set(memo.payout),
            outcome: ActiveValue::Set(memo.outcome.as_str().to_string()),
            winner_id: ActiveValue::Set(memo.winner_id.map(|id| id.to_string())),
            created_at: ActiveValue::Set(created_at),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(WagerRecord::from_entity(entity)?)
    }

    /// Gets the most recent wagers a user took part in, newest first.
    ///
    /// # Arguments
    /// - `guild_id` - Guild to search in
    /// - `user_id` - Participant on either side of the wager
    /// - `limit` - Maximum number of records to return
    ///
    /// # Returns
    /// - `Ok(Vec<WagerRecord>)` - Matching records (empty if none)
    /// - `Err(DbErr)` - Database error, or a stored id that cannot be parsed
    pub async fn get_recent_for_user(
        &self,
        guild_id: u64,
        user_id: u64,
        limit: u64,
    ) -> Result<Vec<WagerRecord>, DbErr> {
        let user_id = user_id.to_string();

        let entities = entity::prelude::WagerLog::find()
            .filter(entity::wager_log::Column::GuildId.eq(guild_id.to_string()))
            .filter(
                Condition::any()
                    .add(entity::wager_log::Column::ChallengerId.eq(user_id.clone()))
                    .add(entity::wager_log::Column::OpponentId.eq(user_id)),
            )
            .order_by_desc(entity::wager_log::Column::CreatedAt)
            .order_by_desc(entity::wager_log::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        entities
            .into_iter()
            .map(|e| WagerRecord::from_entity(e).map_err(DbErr::from))
            .collect()
    }
}
