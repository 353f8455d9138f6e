//! Database error classification.

use pulse_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Classify a write error against the database's constraint system.
///
/// Unique-constraint violations become [`AppError::Conflict`] with
/// `conflict_msg`; foreign-key violations become [`AppError::ForeignKey`]
/// (mapped to 404) with `fk_msg`. Anything else is a server-side database
/// error.
pub fn classify_write_err(err: DbErr, conflict_msg: &str, fk_msg: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(conflict_msg.to_string()),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::ForeignKey(fk_msg.to_string()),
        _ => AppError::Database(err.to_string()),
    }
}

/// Returns true if the error is a unique-constraint violation.
///
/// Used by find-or-create paths that resolve insert races by re-fetching.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
