use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, DbBackend, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Collects the tables a test needs and creates them in a fresh in-memory database.
///
/// Tables are generated from the SeaORM entities rather than the migrations, so a test
/// only pays for the tables it names.
///
/// ```rust,ignore
/// let test = TestBuilder::new().with_table(Account).build().await?;
/// let db = test.db.as_ref().unwrap();
/// ```
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
}

impl TestBuilder {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds the table of `entity`, created in the order tables were added.
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        self.tables
            .push(Schema::new(DbBackend::Sqlite).create_table_from_entity(entity));
        self
    }

    /// Both tables a settlement writes to: `account` and `wager_log`.
    pub fn with_ledger_tables(self) -> Self {
        self.with_table(Account).with_table(WagerLog)
    }

    /// Connects the database and creates every added table.
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut test = TestContext::new();
        test.create_tables(self.tables).await?;

        Ok(test)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
