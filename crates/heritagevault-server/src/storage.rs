//! Storage abstraction for users, artifacts and subscriptions.
//!
//! Handlers receive an `Arc<dyn Storage>` through [`crate::AppState`] rather
//! than reaching for a module-level singleton, so the same routes run
//! against Postgres in production and the in-memory backend in tests and
//! credential-less demo deployments.

pub mod mem;
pub mod pg;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Artifact, NewArtifact, NewSubscription, NewUser, Subscription, User};

pub use mem::MemStorage;
pub use pg::PgStorage;

/// Storage backend error.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Repository over the three HeritageVault tables.
///
/// Lookups return `Ok(None)` for unknown identifiers; handlers translate
/// that into 404 responses. Identifier assignment is sequential per table
/// and atomic across concurrent creates.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn user(&self, id: i32) -> Result<Option<User>, StorageError>;
    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;
    async fn create_user(&self, new_user: NewUser) -> Result<User, StorageError>;
    async fn set_authenticated(
        &self,
        id: i32,
        authenticated: bool,
    ) -> Result<Option<User>, StorageError>;
    async fn set_subscription(
        &self,
        id: i32,
        active: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Option<User>, StorageError>;

    async fn artifact(&self, id: i32) -> Result<Option<Artifact>, StorageError>;
    /// All artifacts in insertion order. No pagination, no filtering.
    async fn artifacts(&self) -> Result<Vec<Artifact>, StorageError>;
    async fn create_artifact(&self, new_artifact: NewArtifact) -> Result<Artifact, StorageError>;
    /// Flips the verified flag and records the timestamp of the first
    /// successful verification. The hash fields recorded at creation are
    /// never touched; calling this again later is a no-op apart from
    /// returning the current record.
    async fn mark_verified(
        &self,
        id: i32,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<Artifact>, StorageError>;

    async fn create_subscription(
        &self,
        new_subscription: NewSubscription,
    ) -> Result<Subscription, StorageError>;
    async fn active_subscription(
        &self,
        user_id: i32,
    ) -> Result<Option<Subscription>, StorageError>;
}
