//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with both a `Factory` struct for customization
//! and a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let account = factory::create_account(&db, "1", "2", 100).await?;
//!
//! let account = factory::account::AccountFactory::new(&db)
//!     .guild_id("1")
//!     .user_id("2")
//!     .cash(250)
//!     .bank(10)
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `account` - Create ledger balance rows
//! - `wager_log` - Create settled wager history rows
//! - `helpers` - Shared id generation

pub mod account;
pub mod helpers;
pub mod wager_log;

// Re-export commonly used factory functions for concise usage
pub use account::create_account;
pub use wager_log::create_wager_log;
