//! In-process registries of pending wagers.
//!
//! A `Registry` maps challenge ids to pending wagers of one game kind for the lifetime
//! of the process. Every check-then-act sequence (conflict scan and insert, validate
//! and mutate, claim for settlement) runs under a single write lock with no await in
//! between, so two concurrent interactions can never both pass the same check.

use chrono::{Duration as ChronoDuration, Utc};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{sync::RwLock, time::Instant};

use crate::{
    error::game::GameError,
    model::game::{Challenge, ChallengeId, DuelOutcome, GameKind, Opponent},
};

/// Seconds a challenge may stay pending before the sweeper removes it.
pub const CHALLENGE_TTL_SECONDS: u64 = 60;

/// A pending wager tracked by a `Registry` and settled against the ledger.
pub trait Wager: Clone + Send + Sync + 'static {
    fn id(&self) -> &ChallengeId;
    fn game(&self) -> GameKind;
    fn guild_id(&self) -> u64;
    /// Participant A of the settlement.
    fn challenger_id(&self) -> u64;
    /// Participant B, or `None` when the house is the counterparty.
    fn opponent_id(&self) -> Option<u64>;
    /// Cash each participant has at risk when the wager settles.
    fn stake(&self) -> i64;
    fn deadline(&self) -> Instant;

    /// Outcome settled against the ledger when the wager times out.
    ///
    /// `None` lets the wager lapse with nothing paid.
    fn forfeit(&self) -> Option<DuelOutcome> {
        None
    }

    fn involves(&self, user_id: u64) -> bool {
        self.challenger_id() == user_id || self.opponent_id() == Some(user_id)
    }
}

impl<S: Clone + Send + Sync + 'static> Wager for Challenge<S> {
    fn id(&self) -> &ChallengeId {
        &self.id
    }

    fn game(&self) -> GameKind {
        self.game
    }

    fn guild_id(&self) -> u64 {
        self.guild_id
    }

    fn challenger_id(&self) -> u64 {
        self.challenger_id
    }

    fn opponent_id(&self) -> Option<u64> {
        Some(self.opponent_id)
    }

    fn stake(&self) -> i64 {
        self.stake
    }

    fn deadline(&self) -> Instant {
        self.deadline
    }
}

/// Result of the sweeper re-checking an entry.
#[derive(Debug)]
pub enum Expiry<W> {
    /// Already resolved or declined.
    Gone,
    /// A settlement holds the entry; check again later.
    Settling,
    /// The deadline moved; sleep until the new one.
    Extended(Instant),
    /// Removed from the registry.
    Expired(W),
    /// Past its deadline and still stored; settle `DuelOutcome` to retire it.
    Forfeit(W, DuelOutcome),
}

struct Entry<W> {
    wager: W,
    /// Set while a settlement is awaiting the ledger.
    settling: bool,
}

impl<W: Wager> Entry<W> {
    /// A wager owing a forfeit stays live until the forfeit is settled.
    fn is_live(&self, now: Instant) -> bool {
        self.settling || self.wager.deadline() > now || self.wager.forfeit().is_some()
    }
}

/// Registry of pending wagers of one game kind.
///
/// Cloning is cheap and every clone shares the same entries.
pub struct Registry<W> {
    entries: Arc<RwLock<HashMap<ChallengeId, Entry<W>>>>,
}

impl<W> Clone for Registry<W> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<W: Wager> Default for Registry<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Wager> Registry<W> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Stores a wager unless one of its participants already has a live wager of the
    /// same game in the same guild.
    ///
    /// # Returns
    /// - `Ok(())` - Wager stored
    /// - `Err(GameError::AlreadyPending)` - A participant is busy; nothing stored
    pub async fn insert(&self, wager: W) -> Result<(), GameError> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();

        let participants = std::iter::once(wager.challenger_id()).chain(wager.opponent_id());
        for user_id in participants {
            let busy = active_in(&entries, wager.guild_id(), now)
                .any(|existing| existing.game() == wager.game() && existing.involves(user_id));

            if busy {
                return Err(GameError::AlreadyPending {
                    user_id,
                    game: wager.game(),
                });
            }
        }

        entries.insert(
            wager.id().clone(),
            Entry {
                wager,
                settling: false,
            },
        );

        Ok(())
    }

    /// Gets a snapshot of a pending wager.
    ///
    /// # Returns
    /// - `Ok(W)` - The wager as currently stored
    /// - `Err(GameError::NotFound)` - No such wager
    pub async fn get(&self, id: &ChallengeId) -> Result<W, GameError> {
        self.entries
            .read()
            .await
            .get(id)
            .map(|entry| entry.wager.clone())
            .ok_or(GameError::NotFound)
    }

    /// Removes a wager. Removing a missing id is a no-op.
    pub async fn remove(&self, id: &ChallengeId) -> Option<W> {
        self.entries
            .write()
            .await
            .remove(id)
            .map(|entry| entry.wager)
    }

    /// Wagers of a guild that are neither expired nor finished.
    #[cfg(test)]
    pub async fn list_active(&self, guild_id: u64) -> Vec<W> {
        let entries = self.entries.read().await;

        active_in(&entries, guild_id, Instant::now())
            .cloned()
            .collect()
    }

    /// Validates and mutates a pending wager in one step.
    ///
    /// `apply` must check everything it needs before mutating; if it returns an error
    /// the wager is left as it was. An entry found past its deadline is reported as
    /// expired and removed, unless it still owes a forfeit to the sweeper.
    ///
    /// # Returns
    /// - `Ok((W, T))` - Snapshot after the mutation, with the closure's result
    /// - `Err(GameError::NotFound)` - No such wager
    /// - `Err(GameError::Expired)` - The deadline has passed
    /// - `Err(GameError::SettlementInProgress)` - A settlement holds the entry
    /// - `Err(_)` - Whatever `apply` rejected with
    pub async fn update<T>(
        &self,
        id: &ChallengeId,
        apply: impl FnOnce(&mut W) -> Result<T, GameError>,
    ) -> Result<(W, T), GameError> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(id).ok_or(GameError::NotFound)?;

        if entry.settling {
            return Err(GameError::SettlementInProgress);
        }

        if entry.wager.deadline() <= Instant::now() {
            if entry.wager.forfeit().is_none() {
                entries.remove(id);
            }
            return Err(GameError::Expired);
        }

        let value = apply(&mut entry.wager)?;

        Ok((entry.wager.clone(), value))
    }

    /// Removes a pending wager if `check` allows it.
    ///
    /// # Returns
    /// - `Ok(W)` - The removed wager
    /// - `Err(GameError)` - Same conditions as `update`; nothing removed
    pub async fn take_if(
        &self,
        id: &ChallengeId,
        check: impl FnOnce(&W) -> Result<(), GameError>,
    ) -> Result<W, GameError> {
        let mut entries = self.entries.write().await;
        let entry = entries.get(id).ok_or(GameError::NotFound)?;

        if entry.settling {
            return Err(GameError::SettlementInProgress);
        }

        if entry.wager.deadline() <= Instant::now() {
            if entry.wager.forfeit().is_none() {
                entries.remove(id);
            }
            return Err(GameError::Expired);
        }

        check(&entry.wager)?;

        entries
            .remove(id)
            .map(|entry| entry.wager)
            .ok_or(GameError::NotFound)
    }

    /// Marks a wager as being settled.
    ///
    /// Returns `None` if the wager is gone or another settlement already holds it,
    /// which makes a duplicate settlement trigger a no-op.
    pub async fn claim(&self, id: &ChallengeId) -> Option<W> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(id)?;

        if entry.settling {
            return None;
        }

        entry.settling = true;
        Some(entry.wager.clone())
    }

    /// Returns a claimed wager to pending so the triggering action can be retried.
    pub async fn release(&self, id: &ChallengeId) {
        if let Some(entry) = self.entries.write().await.get_mut(id) {
            entry.settling = false;
        }
    }

    /// Retires the wager if its deadline is at or before `now`.
    ///
    /// A wager without a forfeit is removed here. One with a forfeit is left in place
    /// for the caller to settle.
    pub async fn check_expiry(&self, id: &ChallengeId, now: Instant) -> Expiry<W> {
        let mut entries = self.entries.write().await;

        let Some(entry) = entries.get(id) else {
            return Expiry::Gone;
        };

        if entry.settling {
            return Expiry::Settling;
        }

        let deadline = entry.wager.deadline();
        if deadline > now {
            return Expiry::Extended(deadline);
        }

        if let Some(outcome) = entry.wager.forfeit() {
            return Expiry::Forfeit(entry.wager.clone(), outcome);
        }

        match entries.remove(id) {
            Some(entry) => Expiry::Expired(entry.wager),
            None => Expiry::Gone,
        }
    }
}

fn active_in<W: Wager>(
    entries: &HashMap<ChallengeId, Entry<W>>,
    guild_id: u64,
    now: Instant,
) -> impl Iterator<Item = &W> {
    entries
        .values()
        .filter(move |entry| entry.wager.guild_id() == guild_id && entry.is_live(now))
        .map(|entry| &entry.wager)
}

/// Registry of two-party challenges with game state `S`.
pub type ChallengeRegistry<S> = Registry<Challenge<S>>;

/// Rejects proposals that can never become a valid challenge.
pub fn validate_proposal(
    challenger_id: u64,
    opponent: Opponent,
    stake: i64,
) -> Result<(), GameError> {
    if opponent.user_id == challenger_id {
        return Err(GameError::SelfChallenge);
    }

    if opponent.is_bot {
        return Err(GameError::OpponentExcluded);
    }

    if stake <= 0 {
        return Err(GameError::InvalidStake);
    }

    Ok(())
}

/// Window end for a wager created or refreshed now.
pub fn window_from_now() -> (chrono::DateTime<Utc>, Instant) {
    (
        Utc::now() + ChronoDuration::seconds(CHALLENGE_TTL_SECONDS as i64),
        Instant::now() + Duration::from_secs(CHALLENGE_TTL_SECONDS),
    )
}

impl<S: Clone + Default + Send + Sync + 'static> Registry<Challenge<S>> {
    /// Creates and stores a challenge expiring `CHALLENGE_TTL_SECONDS` from now.
    ///
    /// # Returns
    /// - `Ok(Challenge)` - The stored challenge
    /// - `Err(GameError::SelfChallenge)` - Challenger and opponent are the same user
    /// - `Err(GameError::OpponentExcluded)` - The opponent is a bot
    /// - `Err(GameError::InvalidStake)` - Stake is zero or negative
    /// - `Err(GameError::AlreadyPending)` - A participant has a pending game of this kind
    pub async fn create(
        &self,
        game: GameKind,
        guild_id: u64,
        challenger_id: u64,
        opponent: Opponent,
        stake: i64,
    ) -> Result<Challenge<S>, GameError> {
        validate_proposal(challenger_id, opponent, stake)?;

        let created_at = Utc::now();
        let (expires_at, deadline) = window_from_now();

        let challenge = Challenge {
            id: ChallengeId::new(guild_id, challenger_id, opponent.user_id, created_at),
            game,
            guild_id,
            challenger_id,
            opponent_id: opponent.user_id,
            stake,
            expires_at,
            deadline,
            accepted: false,
            state: S::default(),
        };

        self.insert(challenge.clone()).await?;

        Ok(challenge)
    }
}
