use thiserror::Error;

/// Errors surfaced by every persistence adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The addressed row or document does not exist.
    #[error("entity not found")]
    NotFound,
    /// Stored data or input failed domain validation.
    #[error("validation error: {0}")]
    ValidationError(String),
    /// The store could not be reached in time (pool timeout, IO failure).
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The store rejected the query.
    #[error("database error: {0}")]
    DatabaseError(String),
    /// A document could not be (de)serialised.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// A multi-step write stopped halfway and could not be undone.
    #[error("partial failure: {0}")]
    PartialFailure(String),
}

/// Convenient alias for repository results.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<diesel::result::Error> for RepositoryError {
    fn from(value: diesel::result::Error) -> Self {
        match value {
            diesel::result::Error::NotFound => Self::NotFound,
            // SQLite gives up after `busy_timeout` with SQLITE_BUSY.
            diesel::result::Error::DatabaseError(_, info) if is_busy(info.message()) => {
                Self::Unavailable(info.message().to_string())
            }
            other => Self::DatabaseError(other.to_string()),
        }
    }
}

fn is_busy(message: &str) -> bool {
    message.contains("database is locked") || message.contains("database is busy")
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(value: diesel::r2d2::PoolError) -> Self {
        Self::Unavailable(value.to_string())
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(value: std::io::Error) -> Self {
        Self::Unavailable(value.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use diesel::result::{DatabaseErrorKind, Error};

    use super::*;

    #[test]
    fn locked_database_is_unavailable() {
        let locked = Error::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new("database is locked".to_string()),
        );
        assert_eq!(
            RepositoryError::from(locked),
            RepositoryError::Unavailable("database is locked".to_string())
        );
    }

    #[test]
    fn other_database_errors_stay_database_errors() {
        let unique = Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("UNIQUE constraint failed: categories.id".to_string()),
        );
        assert!(matches!(
            RepositoryError::from(unique),
            RepositoryError::DatabaseError(_)
        ));
        assert_eq!(RepositoryError::from(Error::NotFound), RepositoryError::NotFound);
    }
}
