mod account;
mod wager_log;
