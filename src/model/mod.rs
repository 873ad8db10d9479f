//! Domain models and parameter types.
//!
//! This module contains domain models used throughout the service layer. Entity models
//! are converted to domain models at the repository boundary; services and the bot
//! transport only ever see these types.

pub mod account;
pub mod card;
pub mod game;
pub mod wager;
