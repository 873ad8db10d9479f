//! Ledger domain models.
//!
//! Provides the balance types the settlement engine reads and writes, plus the
//! parameter types describing a multi-leg ledger transfer and its result.

use chrono::{DateTime, Utc};

use crate::model::wager::WagerMemo;

/// Both currency counters of one account.
///
/// `cash` is the primary currency every wager is placed in; `bank` is the
/// secondary currency which games never touch directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Balance {
    /// Primary currency.
    pub cash: i64,
    /// Secondary currency.
    pub bank: i64,
}

impl Balance {
    pub fn new(cash: i64, bank: i64) -> Self {
        Self { cash, bank }
    }

    /// Returns the balance after applying `delta`, or `None` if either counter
    /// would overflow.
    pub fn apply(self, delta: BalanceDelta) -> Option<Self> {
        Some(Self {
            cash: self.cash.checked_add(delta.cash)?,
            bank: self.bank.checked_add(delta.bank)?,
        })
    }
}

/// Signed change to both currency counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceDelta {
    pub cash: i64,
    pub bank: i64,
}

impl BalanceDelta {
    /// A change to the primary currency only.
    pub fn cash(amount: i64) -> Self {
        Self {
            cash: amount,
            bank: 0,
        }
    }
}

/// Account of a user within one guild.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub guild_id: u64,
    pub user_id: u64,
    pub balance: Balance,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Converts an entity model to an account domain model at the repository boundary.
    ///
    /// The caller supplies the ids it queried by so no stored string has to be parsed.
    pub fn from_entity(guild_id: u64, user_id: u64, entity: entity::account::Model) -> Self {
        Self {
            guild_id,
            user_id,
            balance: Balance::new(entity.cash, entity.bank),
            updated_at: entity.updated_at,
        }
    }
}

/// One participant's side of a ledger transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerLeg {
    /// Discord user the leg applies to.
    pub user_id: u64,
    /// Change applied when the transfer commits.
    pub delta: BalanceDelta,
    /// Cash the account must hold before the change for the transfer to commit.
    ///
    /// For a wager this is the stake the participant has at risk, regardless of
    /// whether they won.
    pub required_cash: i64,
}

impl LedgerLeg {
    /// Balance after this leg is applied to `current`, or the shortfall blocking it.
    ///
    /// Cash below `required_cash`, a negative counter afterwards, or a counter
    /// that would overflow all block the leg.
    pub fn apply_to(&self, current: Balance) -> Result<Balance, Shortfall> {
        let short_of_cash = Shortfall {
            user_id: self.user_id,
            balance: current.cash,
            required: self.required_cash.max(-self.delta.cash),
        };

        if current.cash < self.required_cash {
            return Err(short_of_cash);
        }

        let after = current.apply(self.delta).ok_or(short_of_cash)?;
        if after.cash < 0 {
            return Err(short_of_cash);
        }
        if after.bank < 0 {
            return Err(Shortfall {
                user_id: self.user_id,
                balance: current.bank,
                required: -self.delta.bank,
            });
        }

        Ok(after)
    }
}

/// An all-or-nothing change to one or more accounts of a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerTransfer {
    pub guild_id: u64,
    pub legs: Vec<LedgerLeg>,
    /// History row written in the same transaction, if any.
    pub memo: Option<WagerMemo>,
}

impl LedgerTransfer {
    /// A single-account adjustment that may not leave either counter negative.
    pub fn single(guild_id: u64, user_id: u64, delta: BalanceDelta) -> Self {
        Self {
            guild_id,
            legs: vec![LedgerLeg {
                user_id,
                delta,
                required_cash: 0,
            }],
            memo: None,
        }
    }
}

/// Participant who could not cover their side of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub user_id: u64,
    /// Cash held when the transfer was attempted.
    pub balance: i64,
    /// Cash the transfer needed.
    pub required: i64,
}

/// Result of a ledger transfer that reached the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommit {
    /// Every leg was applied; balances after the change, in leg order.
    Applied(Vec<(u64, Balance)>),
    /// Nothing was applied because one participant could not cover their leg.
    Insufficient(Shortfall),
}
