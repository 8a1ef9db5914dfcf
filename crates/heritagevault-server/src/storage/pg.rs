//! PostgreSQL storage backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use heritagevault_hash::ArtifactKind;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};

use crate::models::{Artifact, NewArtifact, NewSubscription, NewUser, Subscription, User};
use crate::storage::{Storage, StorageError};

const ARTIFACT_COLUMNS: &str = "id, name, description, kind, origin, price, image_url, \
     image_path, verification_hash, metadata_hash, verified, verified_at, owner_id, created_at";

const USER_COLUMNS: &str = "id, username, password, is_authenticated, has_subscription, \
     subscription_expires_at, created_at";

const SUBSCRIPTION_COLUMNS: &str =
    "id, user_id, plan, start_date, end_date, active, created_at";

/// Storage backend over a PostgreSQL pool.
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connects to the database and runs pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Row shape for the artifacts table. The `kind` column is TEXT with a CHECK
/// constraint, decoded into [`ArtifactKind`] on the way out.
#[derive(FromRow)]
struct ArtifactRow {
    id: i32,
    name: String,
    description: String,
    kind: String,
    origin: String,
    price: i64,
    image_url: String,
    image_path: Option<String>,
    verification_hash: Option<String>,
    metadata_hash: Option<String>,
    verified: bool,
    verified_at: Option<DateTime<Utc>>,
    owner_id: i32,
    created_at: DateTime<Utc>,
}

impl From<ArtifactRow> for Artifact {
    fn from(row: ArtifactRow) -> Self {
        Artifact {
            id: row.id,
            name: row.name,
            description: row.description,
            // The CHECK constraint keeps this parse from ever seeing an
            // unknown value; Other is the conservative fallback anyway.
            kind: row.kind.parse().unwrap_or(ArtifactKind::Other),
            origin: row.origin,
            price: row.price,
            image_url: row.image_url,
            image_path: row.image_path,
            verification_hash: row.verification_hash,
            metadata_hash: row.metadata_hash,
            verified: row.verified,
            verified_at: row.verified_at,
            owner_id: row.owner_id,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn user(&self, id: i32) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StorageError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.username)
        .bind(&new_user.password)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn set_authenticated(
        &self,
        id: i32,
        authenticated: bool,
    ) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET is_authenticated = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(authenticated)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn set_subscription(
        &self,
        id: i32,
        active: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET has_subscription = $2, subscription_expires_at = $3 \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(active)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn artifact(&self, id: i32) -> Result<Option<Artifact>, StorageError> {
        let row = sqlx::query_as::<_, ArtifactRow>(&format!(
            "SELECT {ARTIFACT_COLUMNS} FROM artifacts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Artifact::from))
    }

    async fn artifacts(&self) -> Result<Vec<Artifact>, StorageError> {
        let rows = sqlx::query_as::<_, ArtifactRow>(&format!(
            "SELECT {ARTIFACT_COLUMNS} FROM artifacts ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Artifact::from).collect())
    }

    async fn create_artifact(&self, new_artifact: NewArtifact) -> Result<Artifact, StorageError> {
        let row = sqlx::query_as::<_, ArtifactRow>(&format!(
            "INSERT INTO artifacts \
                 (name, description, kind, origin, price, image_url, image_path, \
                  verification_hash, metadata_hash, owner_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {ARTIFACT_COLUMNS}"
        ))
        .bind(&new_artifact.name)
        .bind(&new_artifact.description)
        .bind(new_artifact.kind.as_str())
        .bind(&new_artifact.origin)
        .bind(new_artifact.price)
        .bind(&new_artifact.image_url)
        .bind(&new_artifact.image_path)
        .bind(&new_artifact.verification_hash)
        .bind(&new_artifact.metadata_hash)
        .bind(new_artifact.owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn mark_verified(
        &self,
        id: i32,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<Artifact>, StorageError> {
        // Single atomic update; COALESCE keeps the first verification
        // timestamp on repeated calls.
        let row = sqlx::query_as::<_, ArtifactRow>(&format!(
            "UPDATE artifacts SET verified = TRUE, verified_at = COALESCE(verified_at, $2) \
             WHERE id = $1 RETURNING {ARTIFACT_COLUMNS}"
        ))
        .bind(id)
        .bind(verified_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Artifact::from))
    }

    async fn create_subscription(
        &self,
        new_subscription: NewSubscription,
    ) -> Result<Subscription, StorageError> {
        let subscription = sqlx::query_as::<_, Subscription>(&format!(
            "INSERT INTO subscriptions (user_id, plan, end_date) VALUES ($1, $2, $3) \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        ))
        .bind(new_subscription.user_id)
        .bind(&new_subscription.plan)
        .bind(new_subscription.end_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(subscription)
    }

    async fn active_subscription(
        &self,
        user_id: i32,
    ) -> Result<Option<Subscription>, StorageError> {
        let subscription = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
             WHERE user_id = $1 AND active ORDER BY id DESC LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(subscription)
    }
}
