use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;

/// Per-call failures surfaced to the request layer. None of these are fatal
/// to the process; the caller decides how they map to user-facing messages.
#[derive(Debug, Error)]
pub enum Error {
    #[error("user {0} not found")]
    UserNotFound(Uuid),

    /// Rejected at the operation boundary before touching storage
    /// (self-follow, oversized post body, and the like).
    #[error("{0}")]
    ValidationRejected(&'static str),

    /// A unique-key constraint fired at the storage layer. Duplicate follow
    /// edges never surface this way; `follow` absorbs them as a no-op.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl Error {
    /// Maps a unique-key violation to `ConstraintViolation`, passing every
    /// other storage error through untouched.
    pub(crate) fn from_unique(err: sqlx::Error, what: &str) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Error::ConstraintViolation(format!("duplicate {what}"))
            }
            other => Error::Storage(other),
        }
    }
}
