//! Account data repository and the database-backed ledger.
//!
//! This module provides the `AccountRepository` for the per-guild balance rows. All
//! multi-row changes run inside one database transaction which also writes the
//! wager log row, so a settlement is either fully recorded or not at all.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, TransactionTrait,
};

use crate::{
    data::{ledger::Ledger, wager_log::WagerLogRepository},
    model::account::{Account, Balance, LedgerCommit, LedgerTransfer},
};

/// Repository providing database operations for ledger accounts.
pub struct AccountRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AccountRepository<'a> {
    /// Creates a new AccountRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the account of a user in a guild.
    ///
    /// # Returns
    /// - `Ok(Some(Account))` - Account exists
    /// - `Ok(None)` - The user has never held a balance in this guild
    /// - `Err(DbErr)` - Database error during query
    pub async fn find(&self, guild_id: u64, user_id: u64) -> Result<Option<Account>, DbErr> {
        let entity = find_row(self.db, guild_id, user_id).await?;

        Ok(entity.map(|e| Account::from_entity(guild_id, user_id, e)))
    }
}

/// Looks up the balance row of a user on any connection or transaction.
async fn find_row<C: ConnectionTrait>(
    conn: &C,
    guild_id: u64,
    user_id: u64,
) -> Result<Option<entity::account::Model>, DbErr> {
    entity::prelude::Account::find()
        .filter(entity::account::Column::GuildId.eq(guild_id.to_string()))
        .filter(entity::account::Column::UserId.eq(user_id.to_string()))
        .one(conn)
        .await
}

/// Returns the balance row of a user, inserting a zero row first if missing.
async fn find_or_create_row<C: ConnectionTrait>(
    conn: &C,
    guild_id: u64,
    user_id: u64,
) -> Result<entity::account::Model, DbErr> {
    if let Some(existing) = find_row(conn, guild_id, user_id).await? {
        return Ok(existing);
    }

    entity::account::ActiveModel {
        guild_id: ActiveValue::Set(guild_id.to_string()),
        user_id: ActiveValue::Set(user_id.to_string()),
        cash: ActiveValue::Set(0),
        bank: ActiveValue::Set(0),
        updated_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
}

#[async_trait]
impl Ledger for AccountRepository<'_> {
    async fn ensure_account(&self, guild_id: u64, user_id: u64) -> Result<Balance, DbErr> {
        let row = find_or_create_row(self.db, guild_id, user_id).await?;

        Ok(Balance::new(row.cash, row.bank))
    }

    async fn balance(&self, guild_id: u64, user_id: u64) -> Result<Balance, DbErr> {
        Ok(self
            .find(guild_id, user_id)
            .await?
            .map(|account| account.balance)
            .unwrap_or_default())
    }

    async fn transfer(&self, transfer: &LedgerTransfer) -> Result<LedgerCommit, DbErr> {
        let txn = self.db.begin().await?;

        let mut rows = Vec::with_capacity(transfer.legs.len());
        for leg in &transfer.legs {
            rows.push(find_or_create_row(&txn, transfer.guild_id, leg.user_id).await?);
        }

        // Sufficiency is judged on the rows read inside this transaction.
        let mut after = Vec::with_capacity(rows.len());
        for (leg, row) in transfer.legs.iter().zip(&rows) {
            match leg.apply_to(Balance::new(row.cash, row.bank)) {
                Ok(balance) => after.push(balance),
                Err(shortfall) => {
                    txn.rollback().await?;
                    return Ok(LedgerCommit::Insufficient(shortfall));
                }
            }
        }

        let now = Utc::now();
        let mut balances = Vec::with_capacity(rows.len());
        for ((leg, row), after) in transfer.legs.iter().zip(rows).zip(after) {
            let mut active: entity::account::ActiveModel = row.into();
            active.cash = ActiveValue::Set(after.cash);
            active.bank = ActiveValue::Set(after.bank);
            active.updated_at = ActiveValue::Set(now);
            active.update(&txn).await?;

            balances.push((leg.user_id, after));
        }

        if let Some(memo) = &transfer.memo {
            WagerLogRepository::new(&txn)
                .create(transfer.guild_id, memo, now)
                .await?;
        }

        txn.commit().await?;

        Ok(LedgerCommit::Applied(balances))
    }
}

/// Ledger owning its connection, for work that outlives one interaction.
///
/// Expiry timers settle forfeits long after the request that opened the wager has
/// returned, so they cannot borrow the handler's connection.
#[derive(Clone)]
pub struct DatabaseLedger {
    db: DatabaseConnection,
}

impl DatabaseLedger {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Ledger for DatabaseLedger {
    async fn ensure_account(&self, guild_id: u64, user_id: u64) -> Result<Balance, DbErr> {
        AccountRepository::new(&self.db)
            .ensure_account(guild_id, user_id)
            .await
    }

    async fn balance(&self, guild_id: u64, user_id: u64) -> Result<Balance, DbErr> {
        AccountRepository::new(&self.db)
            .balance(guild_id, user_id)
            .await
    }

    async fn transfer(&self, transfer: &LedgerTransfer) -> Result<LedgerCommit, DbErr> {
        AccountRepository::new(&self.db).transfer(transfer).await
    }
}
