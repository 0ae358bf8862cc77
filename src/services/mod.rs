//! Business operations behind the HTTP handlers.
//!
//! Services are plain functions generic over the repository traits they need,
//! so they can be exercised with [`crate::repository::mock::MockRepository`].

use thiserror::Error;

use crate::forms::FormError;
use crate::repository::errors::RepositoryError;
use crate::validation::FieldErrors;

pub mod forms;
pub mod input;
pub mod master_data;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,

    /// The request body could not be read as the expected form.
    #[error("{0}")]
    Form(String),

    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("invalid value: {0}")]
    TypeConstraint(String),

    /// The write clashes with an existing record.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Repository(RepositoryError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            other => ServiceError::Repository(other),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(errors) => ServiceError::Validation(errors),
            FormError::Malformed(message) => ServiceError::Form(message),
            FormError::UnknownField(field) => ServiceError::Form(format!("unknown field `{field}`")),
        }
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors)
    }
}
