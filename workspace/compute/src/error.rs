use thiserror::Error;

/// Error types for the financial engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Rejected before any mutation: a required field is missing or
    /// out of range.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The target record does not exist or belongs to another owner.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request contradicts the record's current state, e.g. paying
    /// a cancelled installment.
    #[error("Consistency error: {0}")]
    Consistency(String),
}

/// Type alias for Result with EngineError
pub type Result<T> = std::result::Result<T, EngineError>;
