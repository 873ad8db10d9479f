use std::num::ParseIntError;
use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// Failure to parse id from String
    #[error("Failed to parse ID from String '{value}': {source}")]
    ParseStringId {
        /// The string value that failed to parse
        value: String,
        /// The underlying parse error
        #[source]
        source: ParseIntError,
    },
}

/// Stored data that cannot be read back is surfaced as a database error so
/// repositories keep a single error type.
impl From<InternalError> for sea_orm::DbErr {
    fn from(err: InternalError) -> Self {
        sea_orm::DbErr::Custom(err.to_string())
    }
}
