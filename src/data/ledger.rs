//! Balance store capability consumed by the game services.
//!
//! Implementations own atomicity: `transfer` must apply every leg or none, and must
//! evaluate each leg's `required_cash` against the balance read inside the same unit
//! as the write. Callers never check sufficiency with a separate earlier read.

use async_trait::async_trait;
use sea_orm::DbErr;

use crate::model::account::{Balance, BalanceDelta, LedgerCommit, LedgerTransfer};

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Creates a zero balance row for the user if none exists.
    ///
    /// # Returns
    /// - `Ok(Balance)` - Current balance of the (possibly new) account
    /// - `Err(DbErr)` - Storage failure
    async fn ensure_account(&self, guild_id: u64, user_id: u64) -> Result<Balance, DbErr>;

    /// Reads the current balance; a missing account reads as zero.
    async fn balance(&self, guild_id: u64, user_id: u64) -> Result<Balance, DbErr>;

    /// Applies all legs of `transfer` as one all-or-nothing unit.
    ///
    /// # Returns
    /// - `Ok(LedgerCommit::Applied)` - Every leg applied, with the resulting balances
    /// - `Ok(LedgerCommit::Insufficient)` - A leg's `required_cash` was not covered or a
    ///   counter would go negative or overflow; nothing was applied
    /// - `Err(DbErr)` - Storage failure; nothing was applied
    async fn transfer(&self, transfer: &LedgerTransfer) -> Result<LedgerCommit, DbErr>;

    /// Applies a single delta that may not leave either counter negative.
    async fn apply_delta(
        &self,
        guild_id: u64,
        user_id: u64,
        delta: BalanceDelta,
    ) -> Result<LedgerCommit, DbErr> {
        self.transfer(&LedgerTransfer::single(guild_id, user_id, delta))
            .await
    }
}
