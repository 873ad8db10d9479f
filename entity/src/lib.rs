//! SeaORM entities for the wagerboard database.

pub mod prelude;

pub mod account;
pub mod wager_log;
