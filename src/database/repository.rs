//! Storage collaborator seams.
//!
//! Handlers and services never touch sqlx directly; they talk to these
//! traits, which are implemented by [`PgStore`](super::postgres::PgStore)
//! and [`InMemoryStore`](super::memory::InMemoryStore).

use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Cat, Feeding, NewUser, Toy, User};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Map the Postgres failures callers care about onto store-neutral variants
    pub fn from_sqlx(err: sqlx::Error, what: &str) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound(what.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() || db.is_foreign_key_violation() => {
                RepositoryError::ConstraintViolation(db.message().to_string())
            }
            sqlx::Error::ColumnDecode { index, source } => {
                RepositoryError::CorruptRow(format!("{} column {}: {}", what, index, source))
            }
            other => RepositoryError::Sqlx(other),
        }
    }
}

/// Which rows of an owned collection a listing may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    OwnedBy(i64),
}

/// Basic CRUD over one entity kind. `create` ignores the incoming id and
/// returns the stored record with its assigned id.
#[async_trait]
pub trait Repository<T: Send + 'static>: Send + Sync {
    async fn create(&self, entity: T) -> Result<T, RepositoryError>;
    async fn get_by_id(&self, id: i64) -> Result<T, RepositoryError>;
    async fn list(&self, scope: Scope) -> Result<Vec<T>, RepositoryError>;
    async fn update(&self, entity: T) -> Result<T, RepositoryError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError>;
}

/// Many-to-many membership between cats and toys
#[async_trait]
pub trait CatToyRepository: Send + Sync {
    async fn toys_for_cat(&self, cat_id: i64) -> Result<Vec<Toy>, RepositoryError>;
    async fn cats_for_toy(&self, toy_id: i64) -> Result<Vec<Cat>, RepositoryError>;
    /// Adding an existing membership is a no-op
    async fn add_toy(&self, cat_id: i64, toy_id: i64) -> Result<(), RepositoryError>;
    /// Removing a missing membership is a no-op
    async fn remove_toy(&self, cat_id: i64, toy_id: i64) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait FeedingRepository: Send + Sync {
    async fn add_feeding(&self, feeding: Feeding) -> Result<Feeding, RepositoryError>;
    /// Newest date first
    async fn feedings_for_cat(&self, cat_id: i64) -> Result<Vec<Feeding>, RepositoryError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    async fn get_user(&self, id: i64) -> Result<User, RepositoryError>;
}

/// Everything the application needs from storage, as one object-safe handle
#[async_trait]
pub trait Store:
    Repository<Cat> + Repository<Toy> + CatToyRepository + FeedingRepository + UserRepository
{
    async fn health_check(&self) -> Result<(), RepositoryError>;
}
