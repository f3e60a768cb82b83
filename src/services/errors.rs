use thiserror::Error;

use crate::ordering::OrderingError;
use crate::repository::errors::RepositoryError;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The admin password was wrong or no session is present.
    #[error("unauthorized")]
    Unauthorized,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// Input was rejected before any store call.
    #[error("{0}")]
    Validation(String),
    /// The backing store rejected or did not answer the call.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    /// A multi-step write stopped halfway.
    #[error("partial failure: {0}")]
    PartialFailure(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::ValidationError(message) => Self::Validation(message),
            RepositoryError::PartialFailure(message) => Self::PartialFailure(message),
            RepositoryError::Serialization(_) => Self::Internal,
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<OrderingError> for ServiceError {
    fn from(value: OrderingError) -> Self {
        match value {
            OrderingError::Validation(message) => Self::Validation(message),
            OrderingError::NotFound => Self::NotFound,
            OrderingError::StoreUnavailable(message) => Self::StoreUnavailable(message),
            OrderingError::PartialFailure(message) => Self::PartialFailure(message),
        }
    }
}
