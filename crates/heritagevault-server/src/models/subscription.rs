//! Subscription model for the mock premium plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A purchased subscription.
///
/// Created on purchase and never mutated; nothing expires subscriptions in
/// the background. The owning user's flag and expiry date are updated
/// alongside creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i32,
    pub user_id: i32,
    pub plan: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new subscription.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub user_id: i32,
    pub plan: String,
    pub end_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn subscription_serializes_camel_case() {
        let now = Utc::now();
        let subscription = Subscription {
            id: 1,
            user_id: 1,
            plan: "premium".to_string(),
            start_date: now,
            end_date: now + Duration::days(30),
            active: true,
            created_at: now,
        };

        let json = serde_json::to_string(&subscription).unwrap();
        assert!(json.contains("\"userId\":1"));
        assert!(json.contains("\"startDate\""));
        assert!(json.contains("\"endDate\""));
        assert!(json.contains("\"active\":true"));
    }
}
