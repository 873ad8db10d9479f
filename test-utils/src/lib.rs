//! Wagerboard Test Utils
//!
//! Provides shared testing utilities for the wagerboard bot. This crate offers a builder
//! pattern for creating test contexts with in-memory SQLite databases and factories for
//! seeding ledger rows.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Entity factories with sensible defaults
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//!
//! #[tokio::test]
//! async fn test_ledger_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new().with_ledger_tables().build().await?;
//!     let db = test.db.as_ref().unwrap();
//!
//!     let account = factory::account::create_account(db, "1", "2", 100).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
