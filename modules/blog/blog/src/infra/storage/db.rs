//! Database error conversion helpers.

use sea_orm::{DbErr, SqlErr};

use crate::domain::error::DomainError;

/// Convert a storage error into a `DomainError`.
///
/// Unique and foreign-key violations keep their identity so callers can
/// report them as conflicts instead of opaque database failures.
pub fn db_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => DomainError::conflict(message),
        Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
            DomainError::constraint_violation(message)
        }
        _ => DomainError::database(e.to_string()),
    }
}
