//! Error conversion glue between layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the conversions live here. Service-side impls only exist with the `server`
//! feature.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::domain::types::TypeConstraintError;
    use crate::forms::auth::LoginFormError;
    use crate::forms::categories::CategoryFormError;
    use crate::forms::messages::ContactFormError;
    use crate::forms::projects::ProjectFormError;
    use crate::forms::reviews::ReviewFormError;
    use crate::services::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::Validation(val.to_string())
        }
    }

    impl From<LoginFormError> for ServiceError {
        fn from(val: LoginFormError) -> Self {
            ServiceError::Validation(val.to_string())
        }
    }

    impl From<CategoryFormError> for ServiceError {
        fn from(val: CategoryFormError) -> Self {
            ServiceError::Validation(val.to_string())
        }
    }

    impl From<ProjectFormError> for ServiceError {
        fn from(val: ProjectFormError) -> Self {
            ServiceError::Validation(val.to_string())
        }
    }

    impl From<ContactFormError> for ServiceError {
        fn from(val: ContactFormError) -> Self {
            ServiceError::Validation(val.to_string())
        }
    }

    impl From<ReviewFormError> for ServiceError {
        fn from(val: ReviewFormError) -> Self {
            ServiceError::Validation(val.to_string())
        }
    }
}
