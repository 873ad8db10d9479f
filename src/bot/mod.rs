//! Discord transport for games and the economy.
//!
//! Slash commands open games and query balances; button presses on the posted game
//! messages carry accept, decline and move actions back in. Every interaction is
//! turned into a structured action for the game service and the reply is rendered
//! back, so nothing in here decides game rules.
//!
//! # Gateway Intents
//!
//! Interactions arrive without any intent; the bot only requests `GUILDS` so command
//! registration and guild context work.

pub mod command;
pub mod custom_id;
pub mod handler;
pub mod notifier;
pub mod render;
pub mod start;
