//! Database repository layer.
//!
//! Repositories use SeaORM entity models internally and return domain models from
//! `crate::model`. The `Ledger` trait is the only capability the settlement engine
//! needs from persistence; `AccountRepository` is its database-backed implementation.

pub mod account;
pub mod ledger;
pub mod wager_log;

#[cfg(test)]
mod test;
