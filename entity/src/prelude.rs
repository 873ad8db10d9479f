pub use super::account::Entity as Account;
pub use super::wager_log::Entity as WagerLog;
