//! Game domain models.
//!
//! Provides the challenge type tracked by the registries, the structured actions the
//! interaction transport delivers, and the replies the transport renders back.

use chrono::{DateTime, Utc};
use std::fmt;
use tokio::time::Instant;

use crate::model::{
    account::{Balance, Shortfall},
    card::Hand,
};

/// The minigames a wager can be placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Dice,
    RockPaperScissors,
    Blackjack,
}

impl GameKind {
    /// Stable identifier used in component ids and the wager log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dice => "dice",
            Self::RockPaperScissors => "rps",
            Self::Blackjack => "blackjack",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dice" => Some(Self::Dice),
            "rps" => Some(Self::RockPaperScissors),
            "blackjack" => Some(Self::Blackjack),
            _ => None,
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dice => "dice",
            Self::RockPaperScissors => "rock-paper-scissors",
            Self::Blackjack => "blackjack",
        };
        f.write_str(name)
    }
}

/// Opaque identifier of a challenge or blackjack session.
///
/// Derived from the guild, the participants and the creation time in milliseconds,
/// joined with `-` so it fits inside a component custom id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChallengeId(String);

impl ChallengeId {
    pub fn new(
        guild_id: u64,
        challenger_id: u64,
        opponent_id: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self(format!(
            "{}-{}-{}-{}",
            guild_id,
            challenger_id,
            opponent_id,
            created_at.timestamp_millis()
        ))
    }

    /// Identifier of a single-player session against the house.
    pub fn for_session(guild_id: u64, player_id: u64, created_at: DateTime<Utc>) -> Self {
        Self(format!(
            "{}-{}-{}",
            guild_id,
            player_id,
            created_at.timestamp_millis()
        ))
    }

    /// Parses an id received back from the transport.
    ///
    /// # Returns
    /// - `Some(ChallengeId)` - Three or four numeric segments
    /// - `None` - Anything else
    pub fn parse(value: &str) -> Option<Self> {
        let segments: Vec<&str> = value.split('-').collect();
        let numeric = segments
            .iter()
            .all(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()));

        if numeric && (segments.len() == 3 || segments.len() == 4) {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user a challenge is addressed to, as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opponent {
    pub user_id: u64,
    /// Bots never hold a balance and are excluded from wagers.
    pub is_bot: bool,
}

/// A proposed, time-boxed wager between two participants.
///
/// `S` is the game-specific move state, empty at creation.
#[derive(Debug, Clone)]
pub struct Challenge<S> {
    pub id: ChallengeId,
    pub game: GameKind,
    pub guild_id: u64,
    pub challenger_id: u64,
    pub opponent_id: u64,
    /// Positive amount of the primary currency each side puts at risk.
    pub stake: i64,
    /// Wall-clock expiry, used for rendering.
    pub expires_at: DateTime<Utc>,
    /// Monotonic expiry the sweeper and registry compare against.
    pub deadline: Instant,
    pub accepted: bool,
    pub state: S,
}

impl<S> Challenge<S> {
    pub fn is_participant(&self, user_id: u64) -> bool {
        self.challenger_id == user_id || self.opponent_id == user_id
    }

    pub fn view(&self) -> ChallengeView {
        ChallengeView {
            id: self.id.clone(),
            game: self.game,
            guild_id: self.guild_id,
            challenger_id: self.challenger_id,
            opponent_id: self.opponent_id,
            stake: self.stake,
            expires_at: self.expires_at,
            accepted: self.accepted,
        }
    }
}

/// Game-independent snapshot of a challenge for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeView {
    pub id: ChallengeId,
    pub game: GameKind,
    pub guild_id: u64,
    pub challenger_id: u64,
    pub opponent_id: u64,
    pub stake: i64,
    pub expires_at: DateTime<Utc>,
    pub accepted: bool,
}

/// Who acted, where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionContext {
    pub guild_id: u64,
    pub channel_id: u64,
    pub actor_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeResponse {
    Accept,
    Decline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpsChoice {
    Rock,
    Paper,
    Scissors,
}

impl RpsChoice {
    pub const ALL: [RpsChoice; 3] = [Self::Rock, Self::Paper, Self::Scissors];

    /// Rock beats scissors, paper beats rock, scissors beats paper.
    pub fn beats(&self, other: RpsChoice) -> bool {
        matches!(
            (self, other),
            (Self::Rock, Self::Scissors) | (Self::Paper, Self::Rock) | (Self::Scissors, Self::Paper)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Rock => "🪨",
            Self::Paper => "📄",
            Self::Scissors => "✂️",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlackjackMove {
    Hit,
    Stand,
    Double,
}

impl BlackjackMove {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Stand => "stand",
            Self::Double => "double",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "hit" => Some(Self::Hit),
            "stand" => Some(Self::Stand),
            "double" => Some(Self::Double),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMove {
    Rps(RpsChoice),
    Blackjack(BlackjackMove),
}

/// Move state of a dice challenge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiceState {
    /// Drawn once on acceptance and reused if settlement has to be retried.
    pub rolls: Option<DiceRolls>,
}

/// Move state of a rock-paper-scissors challenge. Choices stay hidden until both are in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RpsState {
    pub challenger: Option<RpsChoice>,
    pub opponent: Option<RpsChoice>,
}

impl RpsState {
    /// Both choices, once both participants have moved.
    pub fn choices(&self) -> Option<(RpsChoice, RpsChoice)> {
        self.challenger.zip(self.opponent)
    }
}

/// Structured user action delivered by the interaction transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameAction {
    /// Opens a challenge, or a blackjack table when `game` is blackjack and there is
    /// no opponent.
    ProposeChallenge {
        game: GameKind,
        opponent: Option<Opponent>,
        stake: i64,
    },
    RespondToChallenge {
        game: GameKind,
        challenge_id: ChallengeId,
        response: ChallengeResponse,
    },
    SubmitMove {
        game: GameKind,
        challenge_id: ChallengeId,
        game_move: GameMove,
    },
}

/// Outcome classification from the point of view of participant A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Win,
    Loss,
    Draw,
    Push,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Draw => "draw",
            Self::Push => "push",
        }
    }
}

/// Tagged outcome of a resolved game with the signed payout of each leg.
///
/// A is the challenger (or blackjack player), B the opponent (or the house).
/// The payouts always sum to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuelOutcome {
    pub kind: OutcomeKind,
    pub payout_a: i64,
    pub payout_b: i64,
}

impl DuelOutcome {
    pub fn a_wins(amount: i64) -> Self {
        Self {
            kind: OutcomeKind::Win,
            payout_a: amount,
            payout_b: -amount,
        }
    }

    pub fn b_wins(amount: i64) -> Self {
        Self {
            kind: OutcomeKind::Loss,
            payout_a: -amount,
            payout_b: amount,
        }
    }

    pub fn draw() -> Self {
        Self {
            kind: OutcomeKind::Draw,
            payout_a: 0,
            payout_b: 0,
        }
    }

    pub fn push() -> Self {
        Self {
            kind: OutcomeKind::Push,
            payout_a: 0,
            payout_b: 0,
        }
    }

    /// Whether any currency changes hands.
    pub fn moves_funds(&self) -> bool {
        self.payout_a != 0 || self.payout_b != 0
    }

    /// The winning participant, if the outcome is decisive.
    pub fn winner(&self, a: u64, b: Option<u64>) -> Option<u64> {
        match self.kind {
            OutcomeKind::Win => Some(a),
            OutcomeKind::Loss => b,
            OutcomeKind::Draw | OutcomeKind::Push => None,
        }
    }
}

/// The dice drawn to resolve a dice duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceRolls {
    /// Number of draws made, 1 to 5.
    pub attempts: u8,
    pub challenger: u8,
    pub opponent: u8,
}

/// Snapshot of a blackjack table for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlackjackView {
    pub id: ChallengeId,
    pub player_id: u64,
    pub stake: i64,
    pub doubled: bool,
    pub finished: bool,
    pub can_double: bool,
    pub player: Hand,
    pub dealer: Hand,
    pub expires_at: DateTime<Utc>,
}

/// How a game was decided, for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Dice(DiceRolls),
    Rps {
        challenger: RpsChoice,
        opponent: RpsChoice,
    },
    Blackjack(BlackjackView),
}

/// What the settlement did to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementStatus {
    /// Payout applied; balances after the payout.
    Paid(Vec<(u64, Balance)>),
    /// Draw or push; the ledger was not touched.
    NoPayout,
    /// A participant could not cover the stake; the wager is void.
    Voided(Shortfall),
}

/// Final result of a wager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReport {
    pub game: GameKind,
    pub challenge_id: ChallengeId,
    pub challenger_id: u64,
    /// `None` when the house was the counterparty.
    pub opponent_id: Option<u64>,
    pub stake: i64,
    pub outcome: DuelOutcome,
    pub resolution: Resolution,
    pub status: SettlementStatus,
}

impl SettlementReport {
    pub fn winner(&self) -> Option<u64> {
        match self.status {
            SettlementStatus::Paid(_) => self.outcome.winner(self.challenger_id, self.opponent_id),
            _ => None,
        }
    }
}

/// Structured reply handed back to the interaction transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameReply {
    ChallengePosted(ChallengeView),
    ChallengeAccepted(ChallengeView),
    ChallengeDeclined {
        challenge: ChallengeView,
        declined_by: u64,
    },
    MoveRecorded {
        challenge: ChallengeView,
        waiting_on: u64,
    },
    TableUpdated(BlackjackView),
    Resolved(SettlementReport),
    /// A duplicate trigger found the wager already settled.
    AlreadySettled,
}
