//! Service layer.
//!
//! Services hold the business rules and coordinate repositories from the data layer.
//! They never build entity models or run queries themselves.

pub mod economy;
pub mod game;
