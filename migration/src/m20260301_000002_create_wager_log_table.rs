use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WagerLog::Table)
                    .if_not_exists()
                    .col(pk_auto(WagerLog::Id))
                    .col(string(WagerLog::GuildId))
                    .col(string(WagerLog::Game))
                    .col(string(WagerLog::ChallengerId))
                    .col(string_null(WagerLog::OpponentId))
                    .col(big_integer(WagerLog::Stake))
                    .col(big_integer(WagerLog::Payout))
                    .col(string(WagerLog::Outcome))
                    .col(string_null(WagerLog::WinnerId))
                    .col(timestamp_with_time_zone(WagerLog::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_wager_log_guild_created")
                    .table(WagerLog::Table)
                    .col(WagerLog::GuildId)
                    .col(WagerLog::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WagerLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum WagerLog {
    Table,
    Id,
    GuildId,
    Game,
    ChallengerId,
    OpponentId,
    Stake,
    Payout,
    Outcome,
    WinnerId,
    CreatedAt,
}
