//! Wager game orchestration.
//!
//! `GameService` turns the structured actions delivered by the interaction transport
//! into registry changes, resolves games once every required move is in and hands the
//! outcome to the settlement engine. It never renders anything; the transport turns
//! the returned `GameReply` or `GameError` into messages.
//!
//! Submodules:
//! - `registry` - Pending wagers and their locking rules
//! - `resolver` - Dice and rock-paper-scissors outcomes
//! - `blackjack` - Blackjack tables against the house
//! - `settlement` - At-most-once ledger settlement
//! - `expiry` - Per-wager expiry timers

pub mod blackjack;
pub mod expiry;
pub mod registry;
pub mod resolver;
pub mod settlement;

#[cfg(test)]
mod test;

use std::sync::Arc;

use crate::{
    data::ledger::Ledger,
    error::game::GameError,
    model::game::{
        ActionContext, BlackjackMove, ChallengeId, ChallengeResponse, DiceState, DuelOutcome,
        GameAction, GameKind, GameMove, GameReply, Opponent, Resolution, RpsChoice, RpsState,
        SettlementReport,
    },
};

use self::{
    blackjack::{BlackjackSession, DeckSource, SessionRegistry, ShuffledDecks},
    expiry::ExpiryNotifier,
    registry::{validate_proposal, window_from_now, ChallengeRegistry, Registry, Wager},
    resolver::{resolve_dice, resolve_rps, roll_dice, DieRoller, RandomDie},
    settlement::SettlementService,
};

/// Process-wide game state shared by every interaction.
///
/// Cloning is cheap; clones share the same registries.
#[derive(Clone)]
pub struct GameState {
    pub dice: ChallengeRegistry<DiceState>,
    pub rps: ChallengeRegistry<RpsState>,
    pub blackjack: SessionRegistry,
    die: Arc<dyn DieRoller>,
    decks: Arc<dyn DeckSource>,
}

impl GameState {
    pub fn new() -> Self {
        Self::with_sources(Arc::new(RandomDie), Arc::new(ShuffledDecks))
    }

    /// Game state drawing dice and decks from the given sources.
    pub fn with_sources(die: Arc<dyn DieRoller>, decks: Arc<dyn DeckSource>) -> Self {
        Self {
            dice: ChallengeRegistry::new(),
            rps: ChallengeRegistry::new(),
            blackjack: SessionRegistry::new(),
            die,
            decks,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Service handling game actions against a ledger.
pub struct GameService<'a> {
    ledger: Arc<dyn Ledger>,
    games: &'a GameState,
    notifier: Arc<dyn ExpiryNotifier>,
}

impl<'a> GameService<'a> {
    /// Creates a new GameService instance.
    ///
    /// # Arguments
    /// - `ledger` - Balance store settlements and timeout forfeits are written to
    /// - `games` - Shared registries
    /// - `notifier` - Where expiry notices of wagers opened by this service go
    pub fn new(
        ledger: Arc<dyn Ledger>,
        games: &'a GameState,
        notifier: Arc<dyn ExpiryNotifier>,
    ) -> Self {
        Self {
            ledger,
            games,
            notifier,
        }
    }

    /// Handles one action of one user.
    ///
    /// Validation and conflict errors leave every registry and the ledger untouched.
    ///
    /// # Returns
    /// - `Ok(GameReply)` - What changed, for rendering
    /// - `Err(GameError)` - Why the action was refused; the message is user-facing
    pub async fn handle(
        &self,
        ctx: &ActionContext,
        action: GameAction,
    ) -> Result<GameReply, GameError> {
        match action {
            GameAction::ProposeChallenge {
                game,
                opponent,
                stake,
            } => self.propose(ctx, game, opponent, stake).await,
            GameAction::RespondToChallenge {
                game,
                challenge_id,
                response,
            } => match game {
                GameKind::Dice => self.respond_dice(ctx, &challenge_id, response).await,
                GameKind::RockPaperScissors => {
                    self.respond_rps(ctx, &challenge_id, response).await
                }
                GameKind::Blackjack => Err(GameError::InvalidMove(
                    "blackjack is played against the house".to_string(),
                )),
            },
            GameAction::SubmitMove {
                game,
                challenge_id,
                game_move,
            } => match (game, game_move) {
                (GameKind::RockPaperScissors, GameMove::Rps(choice)) => {
                    self.submit_rps(ctx, &challenge_id, choice).await
                }
                (GameKind::Blackjack, GameMove::Blackjack(blackjack_move)) => {
                    self.play_blackjack(ctx, &challenge_id, blackjack_move).await
                }
                _ => Err(GameError::InvalidMove(format!("{} has no such move", game))),
            },
        }
    }

    async fn propose(
        &self,
        ctx: &ActionContext,
        game: GameKind,
        opponent: Option<Opponent>,
        stake: i64,
    ) -> Result<GameReply, GameError> {
        if game == GameKind::Blackjack {
            return self.open_table(ctx, stake).await;
        }

        let opponent = opponent.ok_or(GameError::MissingOpponent(game))?;
        validate_proposal(ctx.actor_id, opponent, stake)?;
        self.ensure_funds(ctx.guild_id, ctx.actor_id, stake).await?;

        let view = match game {
            GameKind::Dice => {
                let challenge = self
                    .games
                    .dice
                    .create(game, ctx.guild_id, ctx.actor_id, opponent, stake)
                    .await?;
                self.schedule_expiry(&self.games.dice, &challenge, ctx);
                challenge.view()
            }
            _ => {
                let challenge = self
                    .games
                    .rps
                    .create(game, ctx.guild_id, ctx.actor_id, opponent, stake)
                    .await?;
                self.schedule_expiry(&self.games.rps, &challenge, ctx);
                challenge.view()
            }
        };

        tracing::info!(
            "{} challenge {} opened by {} against {} for {}",
            game.as_str(),
            view.id,
            view.challenger_id,
            view.opponent_id,
            view.stake
        );

        Ok(GameReply::ChallengePosted(view))
    }

    /// Accepting a dice challenge rolls and settles it in one step.
    async fn respond_dice(
        &self,
        ctx: &ActionContext,
        id: &ChallengeId,
        response: ChallengeResponse,
    ) -> Result<GameReply, GameError> {
        if response == ChallengeResponse::Decline {
            return self.decline(&self.games.dice, ctx, id).await;
        }

        let pending = self.games.dice.get(id).await?;
        if pending.opponent_id != ctx.actor_id {
            return Err(GameError::NotAddressed(pending.opponent_id));
        }
        self.ensure_funds(ctx.guild_id, ctx.actor_id, pending.stake)
            .await?;

        let (challenge, rolls) = self
            .games
            .dice
            .update(id, |c| {
                if c.opponent_id != ctx.actor_id {
                    return Err(GameError::NotAddressed(c.opponent_id));
                }

                c.accepted = true;
                Ok(*c
                    .state
                    .rolls
                    .get_or_insert_with(|| roll_dice(self.games.die.as_ref())))
            })
            .await?;

        let outcome = resolve_dice(rolls, challenge.stake);
        self.settle(&self.games.dice, &challenge, outcome, Resolution::Dice(rolls))
            .await
    }

    /// Accepting a rock-paper-scissors challenge opens a fresh window for the moves.
    async fn respond_rps(
        &self,
        ctx: &ActionContext,
        id: &ChallengeId,
        response: ChallengeResponse,
    ) -> Result<GameReply, GameError> {
        if response == ChallengeResponse::Decline {
            return self.decline(&self.games.rps, ctx, id).await;
        }

        let pending = self.games.rps.get(id).await?;
        if pending.opponent_id != ctx.actor_id {
            return Err(GameError::NotAddressed(pending.opponent_id));
        }
        self.ensure_funds(ctx.guild_id, ctx.actor_id, pending.stake)
            .await?;

        let (challenge, ()) = self
            .games
            .rps
            .update(id, |c| {
                if c.opponent_id != ctx.actor_id {
                    return Err(GameError::NotAddressed(c.opponent_id));
                }
                if c.accepted {
                    return Err(GameError::AlreadyAccepted);
                }

                let (expires_at, deadline) = window_from_now();
                c.accepted = true;
                c.expires_at = expires_at;
                c.deadline = deadline;
                Ok(())
            })
            .await?;

        Ok(GameReply::ChallengeAccepted(challenge.view()))
    }

    async fn submit_rps(
        &self,
        ctx: &ActionContext,
        id: &ChallengeId,
        choice: RpsChoice,
    ) -> Result<GameReply, GameError> {
        let (challenge, ()) = self
            .games
            .rps
            .update(id, |c| {
                if !c.is_participant(ctx.actor_id) {
                    return Err(GameError::NotParticipant);
                }
                if !c.accepted {
                    return Err(GameError::NotAccepted);
                }

                let complete = c.state.choices().is_some();
                let slot = if ctx.actor_id == c.challenger_id {
                    &mut c.state.challenger
                } else {
                    &mut c.state.opponent
                };

                // Pressing again once both moved retries a failed settlement.
                if slot.is_some() {
                    return if complete {
                        Ok(())
                    } else {
                        Err(GameError::AlreadyMoved)
                    };
                }

                *slot = Some(choice);
                Ok(())
            })
            .await?;

        match challenge.state.choices() {
            Some((challenger, opponent)) => {
                let outcome = resolve_rps(challenger, opponent, challenge.stake);
                let resolution = Resolution::Rps {
                    challenger,
                    opponent,
                };
                self.settle(&self.games.rps, &challenge, outcome, resolution)
                    .await
            }
            None => {
                let waiting_on = if challenge.state.challenger.is_none() {
                    challenge.challenger_id
                } else {
                    challenge.opponent_id
                };

                Ok(GameReply::MoveRecorded {
                    challenge: challenge.view(),
                    waiting_on,
                })
            }
        }
    }

    /// Either participant may decline until the challenge is accepted.
    async fn decline<S: Clone + Send + Sync + 'static>(
        &self,
        registry: &ChallengeRegistry<S>,
        ctx: &ActionContext,
        id: &ChallengeId,
    ) -> Result<GameReply, GameError> {
        let challenge = registry
            .take_if(id, |c| {
                if !c.is_participant(ctx.actor_id) {
                    return Err(GameError::NotParticipant);
                }
                if c.accepted {
                    return Err(GameError::AlreadyAccepted);
                }
                Ok(())
            })
            .await?;

        tracing::info!(
            "{} challenge {} declined by {}",
            challenge.game.as_str(),
            challenge.id,
            ctx.actor_id
        );

        Ok(GameReply::ChallengeDeclined {
            challenge: challenge.view(),
            declined_by: ctx.actor_id,
        })
    }

    async fn open_table(&self, ctx: &ActionContext, stake: i64) -> Result<GameReply, GameError> {
        if stake <= 0 {
            return Err(GameError::InvalidStake);
        }
        self.ensure_funds(ctx.guild_id, ctx.actor_id, stake).await?;

        let session =
            BlackjackSession::deal(ctx.guild_id, ctx.actor_id, stake, self.games.decks.deck());
        self.games.blackjack.insert(session.clone()).await?;
        self.schedule_expiry(&self.games.blackjack, &session, ctx);

        tracing::info!(
            "blackjack table {} opened by {} for {}",
            session.id,
            session.player_id,
            stake
        );

        // A natural that could not be paid leaves no table to retry from.
        let id = session.id.clone();
        let reply = self.advance_table(session).await;
        if reply.is_err() {
            self.games.blackjack.remove(&id).await;
        }

        reply
    }

    async fn play_blackjack(
        &self,
        ctx: &ActionContext,
        id: &ChallengeId,
        blackjack_move: BlackjackMove,
    ) -> Result<GameReply, GameError> {
        if blackjack_move == BlackjackMove::Double {
            let pending = self.games.blackjack.get(id).await?;
            if pending.player_id != ctx.actor_id {
                return Err(GameError::NotAddressed(pending.player_id));
            }
            if pending.can_double() {
                self.ensure_funds(ctx.guild_id, ctx.actor_id, pending.stake * 2)
                    .await?;
            }
        }

        let (session, ()) = self
            .games
            .blackjack
            .update(id, |s| {
                if s.player_id != ctx.actor_id {
                    return Err(GameError::NotAddressed(s.player_id));
                }
                s.apply(blackjack_move)
            })
            .await?;

        self.advance_table(session).await
    }

    /// Settles a finished table or reports the open one.
    async fn advance_table(&self, session: BlackjackSession) -> Result<GameReply, GameError> {
        match session.outcome() {
            Some(outcome) => {
                let resolution = Resolution::Blackjack(session.view());
                self.settle(&self.games.blackjack, &session, outcome, resolution)
                    .await
            }
            None => Ok(GameReply::TableUpdated(session.view())),
        }
    }

    async fn settle<W: Wager>(
        &self,
        registry: &Registry<W>,
        wager: &W,
        outcome: DuelOutcome,
        resolution: Resolution,
    ) -> Result<GameReply, GameError> {
        let status = SettlementService::new(self.ledger.as_ref())
            .settle(registry, wager.id(), outcome)
            .await?;

        Ok(match status {
            Some(status) => GameReply::Resolved(SettlementReport {
                game: wager.game(),
                challenge_id: wager.id().clone(),
                challenger_id: wager.challenger_id(),
                opponent_id: wager.opponent_id(),
                stake: wager.stake(),
                outcome,
                resolution,
                status,
            }),
            None => GameReply::AlreadySettled,
        })
    }

    /// Early rejection when a participant cannot cover `required`.
    ///
    /// Advisory only: the authoritative check runs inside the settlement transaction.
    async fn ensure_funds(
        &self,
        guild_id: u64,
        user_id: u64,
        required: i64,
    ) -> Result<(), GameError> {
        let balance = self.ledger.balance(guild_id, user_id).await?;

        if balance.cash < required {
            return Err(GameError::InsufficientFunds {
                user_id,
                balance: balance.cash,
                required,
            });
        }

        Ok(())
    }

    fn schedule_expiry<W: Wager>(&self, registry: &Registry<W>, wager: &W, ctx: &ActionContext) {
        expiry::schedule(
            registry.clone(),
            wager,
            ctx.channel_id,
            self.ledger.clone(),
            self.notifier.clone(),
        );
    }
}
