use async_trait::async_trait;
use sea_orm::DbErr;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use crate::{
    data::ledger::Ledger,
    error::game::GameError,
    model::{
        account::{Balance, LedgerCommit, LedgerTransfer},
        game::{
            ActionContext, ChallengeId, ChallengeResponse, GameAction, GameKind, GameMove,
            GameReply, Opponent, OutcomeKind, Resolution, SettlementStatus,
        },
    },
    service::game::{
        blackjack::tests::StackedDecks, expiry::tests::RecordingNotifier,
        resolver::tests::SequenceDie, GameService, GameState,
    },
};


const GUILD: u64 = 1;
const CHANNEL: u64 = 500;
const ALICE: u64 = 10;
const BOB: u64 = 20;
const CAROL: u64 = 30;

/// In-memory ledger with failure injection.
#[derive(Default)]
pub(crate) struct MemoryLedger {
    accounts: Mutex<HashMap<(u64, u64), Balance>>,
    /// When set, every transfer fails with a storage error.
    fail: AtomicBool,
    /// Number of transfers that were applied.
    writes: AtomicUsize,
}

impl MemoryLedger {
    pub(crate) fn with_cash(accounts: &[(u64, i64)]) -> Self {
        let ledger = Self::default();
        {
            let mut map = ledger.accounts.lock().unwrap();
            for &(user_id, cash) in accounts {
                map.insert((GUILD, user_id), Balance::new(cash, 0));
            }
        }
        ledger
    }

    pub(crate) fn cash(&self, user_id: u64) -> i64 {
        self.accounts
            .lock()
            .unwrap()
            .get(&(GUILD, user_id))
            .map(|b| b.cash)
            .unwrap_or_default()
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub(crate) fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn ensure_account(&self, guild_id: u64, user_id: u64) -> Result<Balance, DbErr> {
        Ok(*self
            .accounts
            .lock()
            .unwrap()
            .entry((guild_id, user_id))
            .or_default())
    }

    async fn balance(&self, guild_id: u64, user_id: u64) -> Result<Balance, DbErr> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(&(guild_id, user_id))
            .copied()
            .unwrap_or_default())
    }

    async fn transfer(&self, transfer: &LedgerTransfer) -> Result<LedgerCommit, DbErr> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DbErr::Custom("connection reset".to_string()));
        }

        let mut accounts = self.accounts.lock().unwrap();

        let mut balances = Vec::new();
        for leg in &transfer.legs {
            let current = accounts
                .get(&(transfer.guild_id, leg.user_id))
                .copied()
                .unwrap_or_default();

            match leg.apply_to(current) {
                Ok(after) => balances.push((leg.user_id, after)),
                Err(shortfall) => return Ok(LedgerCommit::Insufficient(shortfall)),
            }
        }

        for &(user_id, after) in &balances {
            accounts.insert((transfer.guild_id, user_id), after);
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(LedgerCommit::Applied(balances))
    }
}

/// Everything a service test needs, with fixed dice and decks.
struct Fixture {
    ledger: Arc<MemoryLedger>,
    games: GameState,
    notifier: Arc<RecordingNotifier>,
    die: Arc<SequenceDie>,
}

impl Fixture {
    fn new(accounts: &[(u64, i64)], rolls: &[u8]) -> Self {
        Self::with_deck(accounts, rolls, Vec::new())
    }

    fn with_deck(
        accounts: &[(u64, i64)],
        rolls: &[u8],
        deck: Vec<crate::model::card::Rank>,
    ) -> Self {
        let die = Arc::new(SequenceDie::new(rolls));

        Self {
            ledger: Arc::new(MemoryLedger::with_cash(accounts)),
            games: GameState::with_sources(die.clone(), Arc::new(StackedDecks(deck))),
            notifier: Arc::new(RecordingNotifier::default()),
            die,
        }
    }

    fn service(&self) -> GameService<'_> {
        GameService::new(self.ledger.clone(), &self.games, self.notifier.clone())
    }

    async fn act(&self, actor_id: u64, action: GameAction) -> Result<GameReply, GameError> {
        self.service().handle(&ctx(actor_id), action).await
    }
}

fn ctx(actor_id: u64) -> ActionContext {
    ActionContext {
        guild_id: GUILD,
        channel_id: CHANNEL,
        actor_id,
    }
}

fn propose(game: GameKind, opponent_id: u64, stake: i64) -> GameAction {
    GameAction::ProposeChallenge {
        game,
        opponent: Some(Opponent {
            user_id: opponent_id,
            is_bot: false,
        }),
        stake,
    }
}

fn respond(game: GameKind, id: &ChallengeId, response: ChallengeResponse) -> GameAction {
    GameAction::RespondToChallenge {
        game,
        challenge_id: id.clone(),
        response,
    }
}

fn submit(game: GameKind, id: &ChallengeId, game_move: GameMove) -> GameAction {
    GameAction::SubmitMove {
        game,
        challenge_id: id.clone(),
        game_move,
    }
}

/// Id of a freshly posted challenge.
fn posted_id(reply: GameReply) -> ChallengeId {
    match reply {
        GameReply::ChallengePosted(view) => view.id,
        other => panic!("expected a posted challenge, got {other:?}"),
    }
}

fn resolved(reply: GameReply) -> crate::model::game::SettlementReport {
    match reply {
        GameReply::Resolved(report) => report,
        other => panic!("expected a settlement, got {other:?}"),
    }
}
