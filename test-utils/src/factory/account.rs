//! Account factory for creating ledger balance rows.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test accounts with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::account::AccountFactory;
///
/// let account = AccountFactory::new(&db)
///     .guild_id("1")
///     .user_id("2")
///     .cash(100)
///     .build()
///     .await?;
/// ```
pub struct AccountFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    user_id: String,
    cash: i64,
    bank: i64,
}

impl<'a> AccountFactory<'a> {
    /// Creates a new AccountFactory with default values.
    ///
    /// Defaults:
    /// - guild_id: `"1"`
    /// - user_id: auto-incremented
    /// - cash: `0`
    /// - bank: `0`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: "1".to_string(),
            user_id: next_id().to_string(),
            cash: 0,
            bank: 0,
        }
    }

    /// Sets the guild the account belongs to.
    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    /// Sets the Discord user owning the account.
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Sets the primary currency balance.
    pub fn cash(mut self, cash: i64) -> Self {
        self.cash = cash;
        self
    }

    /// Sets the secondary currency balance.
    pub fn bank(mut self, bank: i64) -> Self {
        self.bank = bank;
        self
    }

    /// Builds and inserts the account entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::account::Model)` - Created account entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::account::Model, DbErr> {
        entity::account::ActiveModel {
            guild_id: ActiveValue::Set(self.guild_id),
            user_id: ActiveValue::Set(self.user_id),
            cash: ActiveValue::Set(self.cash),
            bank: ActiveValue::Set(self.bank),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an account holding `cash` in the primary currency.
///
/// Shorthand for `AccountFactory::new(db).guild_id(..).user_id(..).cash(..).build().await`.
pub async fn create_account(
    db: &DatabaseConnection,
    guild_id: impl Into<String>,
    user_id: impl Into<String>,
    cash: i64,
) -> Result<entity::account::Model, DbErr> {
    AccountFactory::new(db)
        .guild_id(guild_id)
        .user_id(user_id)
        .cash(cash)
        .build()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_account_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(Account).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let account = AccountFactory::new(db).build().await?;

        assert_eq!(account.guild_id, "1");
        assert_eq!(account.cash, 0);
        assert_eq!(account.bank, 0);

        Ok(())
    }

    #[tokio::test]
    async fn creates_account_with_balances() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(Account).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let account = AccountFactory::new(db)
            .guild_id("10")
            .user_id("20")
            .cash(150)
            .bank(5)
            .build()
            .await?;

        assert_eq!(account.guild_id, "10");
        assert_eq!(account.user_id, "20");
        assert_eq!(account.cash, 150);
        assert_eq!(account.bank, 5);

        Ok(())
    }
}
