//! Settlement engine.
//!
//! The only code path that writes a wager's payout to the ledger and the only one
//! that retires a wager after it has been decided. Removal from the registry is the
//! commit signal: it happens after the ledger confirmed the write (or rejected it for
//! insufficient funds), never before.

use crate::{
    data::ledger::Ledger,
    error::game::GameError,
    model::{
        account::{BalanceDelta, LedgerCommit, LedgerLeg, LedgerTransfer},
        game::{ChallengeId, DuelOutcome, SettlementStatus},
        wager::WagerMemo,
    },
    service::game::registry::{Registry, Wager},
};

/// Service applying decided wagers to the ledger.
pub struct SettlementService<'a, L: Ledger + ?Sized> {
    ledger: &'a L,
}

impl<'a, L: Ledger + ?Sized> SettlementService<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Settles a decided wager at most once.
    ///
    /// Claims the registry entry first; if the entry is gone or already claimed by
    /// another settlement this is a no-op. Both stakes are checked inside the same
    /// ledger transaction that moves the payout.
    ///
    /// # Arguments
    /// - `registry` - Registry holding the wager
    /// - `id` - Wager to settle
    /// - `outcome` - Resolver outcome, A being the challenger or blackjack player
    ///
    /// # Returns
    /// - `Ok(Some(SettlementStatus::Paid))` - Payout applied, wager removed
    /// - `Ok(Some(SettlementStatus::NoPayout))` - Draw or push, wager removed
    /// - `Ok(Some(SettlementStatus::Voided))` - A participant could not cover the stake,
    ///   nothing applied, wager removed
    /// - `Ok(None)` - Already settled or being settled elsewhere
    /// - `Err(GameError::LedgerUnavailable)` - Ledger failure, nothing applied, wager
    ///   kept so the action can be retried
    pub async fn settle<W: Wager>(
        &self,
        registry: &Registry<W>,
        id: &ChallengeId,
        outcome: DuelOutcome,
    ) -> Result<Option<SettlementStatus>, GameError> {
        let Some(wager) = registry.claim(id).await else {
            tracing::debug!("Settlement of {} skipped, already settled", id);
            return Ok(None);
        };

        if !outcome.moves_funds() {
            registry.remove(id).await;
            tracing::info!(
                "Settled {} {}: {}, no payout",
                wager.game().as_str(),
                id,
                outcome.kind.as_str()
            );
            return Ok(Some(SettlementStatus::NoPayout));
        }

        let transfer = build_transfer(&wager, outcome);

        match self.ledger.transfer(&transfer).await {
            Ok(LedgerCommit::Applied(balances)) => {
                registry.remove(id).await;
                tracing::info!(
                    "Settled {} {}: {}",
                    wager.game().as_str(),
                    id,
                    outcome.kind.as_str()
                );
                tracing::debug!("Balances after {}: {:?}", id, balances);

                Ok(Some(SettlementStatus::Paid(balances)))
            }
            Ok(LedgerCommit::Insufficient(shortfall)) => {
                registry.remove(id).await;
                tracing::info!(
                    "Voided {} {}: user {} cannot cover the stake",
                    wager.game().as_str(),
                    id,
                    shortfall.user_id
                );

                Ok(Some(SettlementStatus::Voided(shortfall)))
            }
            Err(e) => {
                registry.release(id).await;
                tracing::error!("Ledger failure while settling {}: {}", id, e);

                Err(GameError::LedgerUnavailable(e))
            }
        }
    }
}

/// Ledger legs for a decided wager. The house leg of a blackjack hand is not stored.
fn build_transfer<W: Wager>(wager: &W, outcome: DuelOutcome) -> LedgerTransfer {
    let stake = wager.stake();

    let mut legs = vec![LedgerLeg {
        user_id: wager.challenger_id(),
        delta: BalanceDelta::cash(outcome.payout_a),
        required_cash: stake,
    }];
    if let Some(opponent_id) = wager.opponent_id() {
        legs.push(LedgerLeg {
            user_id: opponent_id,
            delta: BalanceDelta::cash(outcome.payout_b),
            required_cash: stake,
        });
    }

    LedgerTransfer {
        guild_id: wager.guild_id(),
        legs,
        memo: Some(WagerMemo {
            game: wager.game(),
            challenger_id: wager.challenger_id(),
            opponent_id: wager.opponent_id(),
            stake,
            payout: outcome.payout_a.abs(),
            outcome: outcome.kind,
            winner_id: outcome.winner(wager.challenger_id(), wager.opponent_id()),
        }),
    }
}
