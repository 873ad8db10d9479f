//! Economy service for balance queries and administrative adjustments.

use sea_orm::{DatabaseConnection, DbErr};

use crate::{
    data::{account::AccountRepository, ledger::Ledger, wager_log::WagerLogRepository},
    model::{
        account::{Balance, BalanceDelta, LedgerCommit},
        wager::WagerRecord,
    },
};

/// Number of wagers shown by the history command.
pub const RECENT_WAGER_LIMIT: u64 = 10;

/// Service providing balance and wager history operations.
pub struct EconomyService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EconomyService<'a> {
    /// Creates a new EconomyService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a user's balance, opening a zero account on first contact.
    ///
    /// # Returns
    /// - `Ok(Balance)` - Current cash and bank
    /// - `Err(DbErr)` - Database error
    pub async fn balance(&self, guild_id: u64, user_id: u64) -> Result<Balance, DbErr> {
        AccountRepository::new(self.db)
            .ensure_account(guild_id, user_id)
            .await
    }

    /// Adjusts a user's balance on behalf of a moderator.
    ///
    /// # Arguments
    /// - `guild_id` - Guild of the account
    /// - `user_id` - Account owner
    /// - `delta` - Signed change to cash and bank
    ///
    /// # Returns
    /// - `Ok(LedgerCommit::Applied)` - Adjustment applied, with the new balance
    /// - `Ok(LedgerCommit::Insufficient)` - The adjustment would leave a negative balance
    /// - `Err(DbErr)` - Database error
    pub async fn grant(
        &self,
        guild_id: u64,
        user_id: u64,
        delta: BalanceDelta,
    ) -> Result<LedgerCommit, DbErr> {
        let commit = AccountRepository::new(self.db)
            .apply_delta(guild_id, user_id, delta)
            .await?;

        if let LedgerCommit::Applied(_) = commit {
            tracing::info!(
                "Adjusted balance of {} in guild {} by {}/{}",
                user_id,
                guild_id,
                delta.cash,
                delta.bank
            );
        }

        Ok(commit)
    }

    /// Gets the most recent settled wagers of a user.
    pub async fn recent_wagers(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Vec<WagerRecord>, DbErr> {
        WagerLogRepository::new(self.db)
            .get_recent_for_user(guild_id, user_id, RECENT_WAGER_LIMIT)
            .await
    }
}
