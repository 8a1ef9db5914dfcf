//! User model for the demo authentication flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user.
///
/// Passwords are stored and compared as plaintext. That is a known flaw of
/// this demo design, kept as-is; the record (password included) is what the
/// login and current-user endpoints return.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub is_authenticated: bool,
    pub has_subscription: bool,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_camel_case() {
        let user = User {
            id: 1,
            username: "curator".to_string(),
            password: "heritage".to_string(),
            is_authenticated: true,
            has_subscription: false,
            subscription_expires_at: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"isAuthenticated\":true"));
        assert!(json.contains("\"hasSubscription\":false"));
        assert!(json.contains("\"subscriptionExpiresAt\":null"));
    }
}
