use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(pk_auto(Account::Id))
                    .col(string(Account::GuildId))
                    .col(string(Account::UserId))
                    .col(big_integer(Account::Cash).default(0))
                    .col(big_integer(Account::Bank).default(0))
                    .col(timestamp_with_time_zone(Account::UpdatedAt))
                    .index(
                        Index::create()
                            .unique()
                            .name("idx_account_guild_user_unique")
                            .col(Account::GuildId)
                            .col(Account::UserId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Account::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Account {
    Table,
    Id,
    GuildId,
    UserId,
    Cash,
    Bank,
    UpdatedAt,
}
