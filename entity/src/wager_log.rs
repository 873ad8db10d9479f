use sea_orm::entity::prelude::*;

/// A settled wager, written in the same transaction as its payout.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "wager_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: String,
    pub game: String,
    pub challenger_id: String,
    /// `None` when the house was the counterparty.
    pub opponent_id: Option<String>,
    pub stake: i64,
    /// Amount that moved from the loser to the winner.
    pub payout: i64,
    pub outcome: String,
    pub winner_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
