//! Single-player blackjack against the house.
//!
//! A session holds the shoe, both hands and the stake. The house is the settlement
//! counterparty and has no ledger account, so only the player's leg is written.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use tokio::time::Instant;

use crate::{
    error::game::GameError,
    model::{
        card::{Card, Hand, Rank, Suit},
        game::{BlackjackMove, BlackjackView, ChallengeId, DuelOutcome, GameKind},
    },
    service::game::registry::{window_from_now, Registry, Wager},
};

/// The dealer draws while below this value.
pub const DEALER_STANDS_ON: u32 = 17;

/// Cards left to draw; the next card is the last element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// One unshuffled 52-card deck.
    pub fn standard() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(rank, suit)))
            .collect();

        Self { cards }
    }

    /// A deck that deals `cards` in the given order.
    #[cfg(test)]
    pub fn stacked(mut cards: Vec<Card>) -> Self {
        cards.reverse();
        Self { cards }
    }

    /// Deals the next card, opening a fresh deck if this one ran out.
    pub fn draw(&mut self) -> Card {
        if self.cards.is_empty() {
            *self = Self::standard();
        }

        match self.cards.pop() {
            Some(card) => card,
            None => Card::new(Rank::Ace, Suit::Spades),
        }
    }

    #[cfg(test)]
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

/// Supplies the deck for each new table.
pub trait DeckSource: Send + Sync {
    fn deck(&self) -> Deck;
}

/// Freshly shuffled standard deck per table.
pub struct ShuffledDecks;

impl DeckSource for ShuffledDecks {
    fn deck(&self) -> Deck {
        let mut deck = Deck::standard();
        deck.cards.shuffle(&mut rand::rng());
        deck
    }
}

/// A blackjack table of one player against the house.
#[derive(Debug, Clone)]
pub struct BlackjackSession {
    pub id: ChallengeId,
    pub guild_id: u64,
    pub player_id: u64,
    /// Base stake; doubled once a double-down is taken.
    pub stake: i64,
    pub doubled: bool,
    pub finished: bool,
    pub player: Hand,
    pub dealer: Hand,
    deck: Deck,
    pub expires_at: DateTime<Utc>,
    pub deadline: Instant,
}

impl BlackjackSession {
    /// Deals the opening hands.
    ///
    /// A natural on either side ends the hand immediately, before a double is possible.
    pub fn deal(guild_id: u64, player_id: u64, stake: i64, mut deck: Deck) -> Self {
        let mut player = Hand::new();
        let mut dealer = Hand::new();
        for _ in 0..2 {
            player.push(deck.draw());
            dealer.push(deck.draw());
        }

        let created_at = Utc::now();
        let (expires_at, deadline) = window_from_now();
        let finished = player.is_natural() || dealer.is_natural();

        Self {
            id: ChallengeId::for_session(guild_id, player_id, created_at),
            guild_id,
            player_id,
            stake,
            doubled: false,
            finished,
            player,
            dealer,
            deck,
            expires_at,
            deadline,
        }
    }

    /// Applies a player move.
    ///
    /// A move on a finished hand is accepted without changes so the caller can retry
    /// the settlement.
    ///
    /// # Returns
    /// - `Ok(())` - Move applied
    /// - `Err(GameError::InvalidMove)` - Double outside the first two cards
    pub fn apply(&mut self, game_move: BlackjackMove) -> Result<(), GameError> {
        if self.finished {
            return Ok(());
        }

        match game_move {
            BlackjackMove::Hit => {
                self.player.push(self.deck.draw());

                if self.player.is_bust() || self.player.value() == 21 {
                    self.finish();
                } else {
                    let (expires_at, deadline) = window_from_now();
                    self.expires_at = expires_at;
                    self.deadline = deadline;
                }
            }
            BlackjackMove::Stand => self.finish(),
            BlackjackMove::Double => {
                if !self.can_double() {
                    return Err(GameError::InvalidMove(
                        "you can only double down on your first two cards".to_string(),
                    ));
                }

                self.doubled = true;
                self.player.push(self.deck.draw());
                self.finish();
            }
        }

        Ok(())
    }

    fn finish(&mut self) {
        self.play_dealer();
        self.finished = true;
    }

    /// Draws dealer cards until the dealer reaches `DEALER_STANDS_ON`.
    pub fn play_dealer(&mut self) {
        while self.dealer.value() < DEALER_STANDS_ON {
            self.dealer.push(self.deck.draw());
        }
    }

    pub fn can_double(&self) -> bool {
        !self.finished && !self.doubled && self.player.cards().len() == 2
    }

    /// Stake at risk, including a double-down.
    pub fn effective_stake(&self) -> i64 {
        if self.doubled {
            self.stake * 2
        } else {
            self.stake
        }
    }

    /// The hand's outcome once it is finished.
    pub fn outcome(&self) -> Option<DuelOutcome> {
        self.finished
            .then(|| resolve_blackjack(&self.player, &self.dealer, self.stake, self.doubled))
    }

    pub fn view(&self) -> BlackjackView {
        BlackjackView {
            id: self.id.clone(),
            player_id: self.player_id,
            stake: self.effective_stake(),
            doubled: self.doubled,
            finished: self.finished,
            can_double: self.can_double(),
            player: self.player.clone(),
            dealer: self.dealer.clone(),
            expires_at: self.expires_at,
        }
    }
}

impl Wager for BlackjackSession {
    fn id(&self) -> &ChallengeId {
        &self.id
    }

    fn game(&self) -> GameKind {
        GameKind::Blackjack
    }

    fn guild_id(&self) -> u64 {
        self.guild_id
    }

    fn challenger_id(&self) -> u64 {
        self.player_id
    }

    fn opponent_id(&self) -> Option<u64> {
        None
    }

    fn stake(&self) -> i64 {
        self.effective_stake()
    }

    fn deadline(&self) -> Instant {
        self.deadline
    }

    /// An abandoned hand loses its effective stake; a finished one keeps its result.
    fn forfeit(&self) -> Option<DuelOutcome> {
        Some(
            self.outcome()
                .unwrap_or_else(|| DuelOutcome::b_wins(self.effective_stake())),
        )
    }
}

/// Registry of open blackjack tables.
pub type SessionRegistry = Registry<BlackjackSession>;

/// Decides a finished hand from the player's point of view.
///
/// Naturals are settled on the base stake: a player natural pays 3:2 (rounded down),
/// a dealer-only natural loses the base stake and two naturals push. Otherwise a bust
/// player loses, a bust dealer pays even money, and the higher total wins, all on the
/// effective stake.
pub fn resolve_blackjack(player: &Hand, dealer: &Hand, stake: i64, doubled: bool) -> DuelOutcome {
    match (player.is_natural(), dealer.is_natural()) {
        (true, true) => return DuelOutcome::push(),
        (true, false) => return DuelOutcome::a_wins(stake * 3 / 2),
        (false, true) => return DuelOutcome::b_wins(stake),
        (false, false) => {}
    }

    let effective = if doubled { stake * 2 } else { stake };

    if player.is_bust() {
        return DuelOutcome::b_wins(effective);
    }
    if dealer.is_bust() {
        return DuelOutcome::a_wins(effective);
    }

    match player.value().cmp(&dealer.value()) {
        std::cmp::Ordering::Greater => DuelOutcome::a_wins(effective),
        std::cmp::Ordering::Less => DuelOutcome::b_wins(effective),
        std::cmp::Ordering::Equal => DuelOutcome::push(),
    }
}
