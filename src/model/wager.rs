//! Wager history models.

use chrono::{DateTime, Utc};

use crate::{
    error::internal::InternalError,
    model::game::{GameKind, OutcomeKind},
    util::parse::parse_u64_from_string,
};

/// History row written alongside a paid settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WagerMemo {
    pub game: GameKind,
    pub challenger_id: u64,
    /// `None` when the house was the counterparty.
    pub opponent_id: Option<u64>,
    pub stake: i64,
    /// Amount that moved from the loser to the winner.
    pub payout: i64,
    pub outcome: OutcomeKind,
    pub winner_id: Option<u64>,
}

/// A settled wager read back from the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WagerRecord {
    pub game: String,
    pub challenger_id: u64,
    pub opponent_id: Option<u64>,
    pub stake: i64,
    pub payout: i64,
    pub outcome: String,
    pub winner_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl WagerRecord {
    /// Converts an entity model to a wager record at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(WagerRecord)` - The converted record
    /// - `Err(InternalError::ParseStringId)` - A stored Discord id is not a valid u64
    pub fn from_entity(entity: entity::wager_log::Model) -> Result<Self, InternalError> {
        Ok(Self {
            game: entity.game,
            challenger_id: parse_u64_from_string(entity.challenger_id)?,
            opponent_id: entity.opponent_id.map(parse_u64_from_string).transpose()?,
            stake: entity.stake,
            payout: entity.payout,
            outcome: entity.outcome,
            winner_id: entity.winner_id.map(parse_u64_from_string).transpose()?,
            created_at: entity.created_at,
        })
    }

    /// Net change to a participant's cash from this wager.
    ///
    /// A house game lost by the player has no winner id, so anything but a win
    /// counts against the participant. Draws carry a zero payout.
    pub fn net_for(&self, user_id: u64) -> i64 {
        match self.winner_id {
            Some(winner) if winner == user_id => self.payout,
            _ => -self.payout,
        }
    }
}
