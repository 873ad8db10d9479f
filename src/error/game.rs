//! Errors a game action can end in.
//!
//! The `Display` text of each variant is the message the acting user sees.

use sea_orm::DbErr;
use thiserror::Error;

use crate::model::game::GameKind;

/// Coarse class of a `GameError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed request; nothing was mutated.
    Validation,
    /// Request does not fit the current state; nothing was mutated.
    Conflict,
    /// A participant cannot cover the stake.
    InsufficientFunds,
    /// The ledger could not be reached; the wager stays open.
    LedgerUnavailable,
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error("You can't challenge yourself.")]
    SelfChallenge,

    /// The opponent is excluded by policy (bots hold no balance).
    #[error("Bots can't take part in wagers.")]
    OpponentExcluded,

    #[error("The stake must be a positive amount.")]
    InvalidStake,

    #[error("A {0} game needs an opponent.")]
    MissingOpponent(GameKind),

    #[error("That move isn't allowed: {0}")]
    InvalidMove(String),

    /// A participant already has a pending game of the same kind in this guild.
    #[error("<@{user_id}> already has a pending {game} game.")]
    AlreadyPending { user_id: u64, game: GameKind },

    #[error("That game is no longer available.")]
    NotFound,

    #[error("That game has expired.")]
    Expired,

    /// Only the addressed participant may perform this action.
    #[error("Only <@{0}> can do that.")]
    NotAddressed(u64),

    #[error("You're not part of this game.")]
    NotParticipant,

    #[error("You've already made your move.")]
    AlreadyMoved,

    #[error("The challenge hasn't been accepted yet.")]
    NotAccepted,

    #[error("The challenge has already been accepted.")]
    AlreadyAccepted,

    #[error("This game is being settled, hold on.")]
    SettlementInProgress,

    #[error("<@{user_id}> has {balance} cash but {required} is needed.")]
    InsufficientFunds {
        user_id: u64,
        balance: i64,
        required: i64,
    },

    /// Transport or storage failure while talking to the ledger.
    #[error("The bank is unavailable right now, please try again.")]
    LedgerUnavailable(#[from] DbErr),
}

impl GameError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SelfChallenge
            | Self::OpponentExcluded
            | Self::InvalidStake
            | Self::MissingOpponent(_)
            | Self::InvalidMove(_) => ErrorCategory::Validation,
            Self::AlreadyPending { .. }
            | Self::NotFound
            | Self::Expired
            | Self::NotAddressed(_)
            | Self::NotParticipant
            | Self::AlreadyMoved
            | Self::NotAccepted
            | Self::AlreadyAccepted
            | Self::SettlementInProgress => ErrorCategory::Conflict,
            Self::InsufficientFunds { .. } => ErrorCategory::InsufficientFunds,
            Self::LedgerUnavailable(_) => ErrorCategory::LedgerUnavailable,
        }
    }
}
