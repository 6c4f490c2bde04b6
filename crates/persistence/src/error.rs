//! Translation of driver errors into repository errors.

use domain::ports::RepositoryError;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Maps a sqlx error onto the storage-neutral [`RepositoryError`].
///
/// Only "no row" and unique violations get their own kind. Foreign key
/// violations and everything else are reported as plain storage failures,
/// carrying the driver message. Logging is left to the caller.
pub fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            let constraint = db_err.constraint().unwrap_or("unique").to_string();
            RepositoryError::UniqueViolation(constraint)
        }
        other => RepositoryError::Storage(other.to_string()),
    }
}
