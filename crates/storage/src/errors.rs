use sea_orm::{DbErr, SqlErr};

pub use phone_registry_domain::storage::StorageError;

/// Classifies SeaORM failures, keeping unique-constraint violations distinct
/// so callers can report them as conflicts.
pub(crate) fn from_db(err: DbErr) -> StorageError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StorageError::UniqueViolation(detail),
        _ => StorageError::from_source(err),
    }
}
