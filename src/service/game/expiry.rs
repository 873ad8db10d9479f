//! Per-wager expiry timers.
//!
//! Each pending wager gets one spawned task that sleeps until the wager's deadline
//! plus a short grace period and then re-checks the registry by id. There is no
//! cancel handle: a wager that was settled or declined in the meantime is simply gone
//! when the timer fires.
//!
//! A wager that owes a forfeit on timeout is settled through `SettlementService`
//! like any other outcome. Until the ledger accepts it the timer keeps retrying.

use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::Instant};

use crate::{
    data::ledger::Ledger,
    error::AppError,
    model::game::{ChallengeId, DuelOutcome, GameKind, SettlementStatus},
    service::game::{
        registry::{Expiry, Registry, Wager},
        settlement::SettlementService,
    },
};

/// Seconds the sweeper waits past a deadline before removing the wager.
pub const EXPIRY_GRACE_SECONDS: u64 = 2;

/// A wager that timed out without being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryNotice {
    pub id: ChallengeId,
    pub game: GameKind,
    pub guild_id: u64,
    /// Channel the wager was opened in.
    pub channel_id: u64,
    pub challenger_id: u64,
    pub opponent_id: Option<u64>,
    pub stake: i64,
    /// Forfeit applied on timeout; `None` when the wager lapsed unpaid.
    pub settlement: Option<ExpirySettlement>,
}

/// The forfeit a timed-out wager was settled with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpirySettlement {
    pub outcome: DuelOutcome,
    pub status: SettlementStatus,
}

/// Tells the participants that a wager expired.
#[async_trait]
pub trait ExpiryNotifier: Send + Sync {
    async fn notify(&self, notice: &ExpiryNotice) -> Result<(), AppError>;
}

/// Spawns the expiry timer of a freshly stored wager.
///
/// # Arguments
/// - `registry` - Registry holding the wager
/// - `wager` - The wager as stored; its deadline sets the first wake-up
/// - `channel_id` - Where the expiry notice is posted
/// - `ledger` - Where a forfeit is settled
/// - `notifier` - Best-effort notification sink
///
/// # Returns
/// - `JoinHandle<()>` - Completes once the wager is gone, lapsed or forfeited
pub fn schedule<W: Wager>(
    registry: Registry<W>,
    wager: &W,
    channel_id: u64,
    ledger: Arc<dyn Ledger>,
    notifier: Arc<dyn ExpiryNotifier>,
) -> JoinHandle<()> {
    let id = wager.id().clone();
    let grace = Duration::from_secs(EXPIRY_GRACE_SECONDS);
    let mut wake_at = wager.deadline() + grace;

    tokio::spawn(async move {
        loop {
            tokio::time::sleep_until(wake_at).await;

            let (wager, settlement) = match registry.check_expiry(&id, Instant::now()).await {
                Expiry::Gone => return,
                // Retry once the settlement either removed or released the entry.
                Expiry::Settling => {
                    wake_at = Instant::now() + grace;
                    continue;
                }
                Expiry::Extended(deadline) => {
                    wake_at = deadline + grace;
                    continue;
                }
                Expiry::Expired(wager) => {
                    tracing::info!("{} {} expired", wager.game().as_str(), id);
                    (wager, None)
                }
                Expiry::Forfeit(wager, outcome) => {
                    let settled = SettlementService::new(ledger.as_ref())
                        .settle(&registry, &id, outcome)
                        .await;

                    match settled {
                        Ok(Some(status)) => {
                            tracing::info!("{} {} forfeited on timeout", wager.game().as_str(), id);
                            (wager, Some(ExpirySettlement { outcome, status }))
                        }
                        Ok(None) => {
                            wake_at = Instant::now() + grace;
                            continue;
                        }
                        Err(e) => {
                            tracing::warn!("Forfeit of {} not settled, retrying: {}", id, e);
                            wake_at = Instant::now() + grace;
                            continue;
                        }
                    }
                }
            };

            let notice = ExpiryNotice {
                id,
                game: wager.game(),
                guild_id: wager.guild_id(),
                channel_id,
                challenger_id: wager.challenger_id(),
                opponent_id: wager.opponent_id(),
                stake: wager.stake(),
                settlement,
            };

            if let Err(e) = notifier.notify(&notice).await {
                tracing::warn!("Failed to post expiry notice for {}: {}", notice.id, e);
            }

            return;
        }
    })
}
