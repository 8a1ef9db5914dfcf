//! In-memory storage backend.
//!
//! All tables live behind one `parking_lot::Mutex`, which serializes
//! identifier assignment and every read-modify-write mutation; two
//! concurrent verify calls on the same artifact cannot lose an update.
//! Nothing here awaits while holding the lock.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::models::{Artifact, NewArtifact, NewSubscription, NewUser, Subscription, User};
use crate::storage::{Storage, StorageError};

#[derive(Default)]
struct Inner {
    users: BTreeMap<i32, User>,
    artifacts: BTreeMap<i32, Artifact>,
    subscriptions: BTreeMap<i32, Subscription>,
    next_user_id: i32,
    next_artifact_id: i32,
    next_subscription_id: i32,
}

/// Storage backend holding everything in process memory.
#[derive(Default)]
pub struct MemStorage {
    inner: Mutex<Inner>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

#[async_trait]
impl Storage for MemStorage {
    async fn user(&self, id: i32) -> Result<Option<User>, StorageError> {
        Ok(self.inner.lock().users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let inner = self.inner.lock();
        Ok(inner
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StorageError> {
        let mut inner = self.inner.lock();
        let id = next_id(&mut inner.next_user_id);
        let user = User {
            id,
            username: new_user.username,
            password: new_user.password,
            is_authenticated: false,
            has_subscription: false,
            subscription_expires_at: None,
            created_at: Utc::now(),
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn set_authenticated(
        &self,
        id: i32,
        authenticated: bool,
    ) -> Result<Option<User>, StorageError> {
        let mut inner = self.inner.lock();
        Ok(inner.users.get_mut(&id).map(|user| {
            user.is_authenticated = authenticated;
            user.clone()
        }))
    }

    async fn set_subscription(
        &self,
        id: i32,
        active: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Option<User>, StorageError> {
        let mut inner = self.inner.lock();
        Ok(inner.users.get_mut(&id).map(|user| {
            user.has_subscription = active;
            user.subscription_expires_at = expires_at;
            user.clone()
        }))
    }

    async fn artifact(&self, id: i32) -> Result<Option<Artifact>, StorageError> {
        Ok(self.inner.lock().artifacts.get(&id).cloned())
    }

    async fn artifacts(&self) -> Result<Vec<Artifact>, StorageError> {
        // Sequential ids make key order equal insertion order.
        Ok(self.inner.lock().artifacts.values().cloned().collect())
    }

    async fn create_artifact(&self, new_artifact: NewArtifact) -> Result<Artifact, StorageError> {
        let mut inner = self.inner.lock();
        let id = next_id(&mut inner.next_artifact_id);
        let artifact = Artifact {
            id,
            name: new_artifact.name,
            description: new_artifact.description,
            kind: new_artifact.kind,
            origin: new_artifact.origin,
            price: new_artifact.price,
            image_url: new_artifact.image_url,
            image_path: new_artifact.image_path,
            verification_hash: new_artifact.verification_hash,
            metadata_hash: new_artifact.metadata_hash,
            verified: false,
            verified_at: None,
            owner_id: new_artifact.owner_id,
            created_at: Utc::now(),
        };
        inner.artifacts.insert(id, artifact.clone());
        Ok(artifact)
    }

    async fn mark_verified(
        &self,
        id: i32,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<Artifact>, StorageError> {
        let mut inner = self.inner.lock();
        Ok(inner.artifacts.get_mut(&id).map(|artifact| {
            artifact.verified = true;
            artifact.verified_at.get_or_insert(verified_at);
            artifact.clone()
        }))
    }

    async fn create_subscription(
        &self,
        new_subscription: NewSubscription,
    ) -> Result<Subscription, StorageError> {
        let mut inner = self.inner.lock();
        let id = next_id(&mut inner.next_subscription_id);
        let now = Utc::now();
        let subscription = Subscription {
            id,
            user_id: new_subscription.user_id,
            plan: new_subscription.plan,
            start_date: now,
            end_date: new_subscription.end_date,
            active: true,
            created_at: now,
        };
        inner.subscriptions.insert(id, subscription.clone());
        Ok(subscription)
    }

    async fn active_subscription(
        &self,
        user_id: i32,
    ) -> Result<Option<Subscription>, StorageError> {
        let inner = self.inner.lock();
        Ok(inner
            .subscriptions
            .values()
            .rev()
            .find(|sub| sub.user_id == user_id && sub.active)
            .cloned())
    }
}
