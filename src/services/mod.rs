//! Entity access layer: the operations between request handlers and storage.

pub mod accounts;
pub mod cats;
pub mod crud;
pub mod ownership;
pub mod toys;

use thiserror::Error;

use crate::database::RepositoryError;
use crate::forms::FieldErrors;

pub use accounts::AccountService;
pub use cats::{CatDetail, CatService};
pub use crud::{CrudHandler, Resource};
pub use ownership::OwnershipPolicy;
pub use toys::{ToyDetail, ToyService};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::ConstraintViolation(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Repository(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
