//! Mock subscription purchase endpoint.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Months, Utc};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{NewSubscription, Subscription};
use crate::routes::DEMO_USER_ID;
use crate::state::AppState;

/// Purchase request body. `planId` and `expiry` are accepted as aliases
/// used by older front-end revisions.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionRequest {
    #[serde(alias = "planId")]
    pub plan: Option<String>,
    pub months: Option<u32>,
    pub expiry: Option<DateTime<Utc>>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/subscription", post(create_subscription))
}

/// POST /api/subscription
///
/// Creates a subscription for the demo user and flips the user's
/// subscription flag and expiry date. Nothing expires subscriptions later;
/// the record is created active and left alone.
async fn create_subscription(
    State(state): State<AppState>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<Json<Subscription>, AppError> {
    let plan = request
        .plan
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("plan is required".to_string()))?
        .to_string();
    let end_date = subscription_end(&request)?;

    let user = state
        .storage
        .user(DEMO_USER_ID)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    state
        .storage
        .set_subscription(user.id, true, Some(end_date))
        .await?;

    let subscription = state
        .storage
        .create_subscription(NewSubscription {
            user_id: user.id,
            plan,
            end_date,
        })
        .await?;

    tracing::info!(
        user_id = user.id,
        plan = %subscription.plan,
        "subscription created"
    );
    Ok(Json(subscription))
}

/// Explicit expiry wins; otherwise now plus the requested number of months
/// (default one month).
fn subscription_end(request: &SubscriptionRequest) -> Result<DateTime<Utc>, AppError> {
    if let Some(expiry) = request.expiry {
        return Ok(expiry);
    }
    let months = request.months.unwrap_or(1);
    Utc::now()
        .checked_add_months(Months::new(months))
        .ok_or_else(|| AppError::Validation(format!("invalid subscription length: {months} months")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn plan_id_alias_is_accepted() {
        let request: SubscriptionRequest =
            serde_json::from_str(r#"{"planId": "premium", "months": 3}"#).unwrap();
        assert_eq!(request.plan.as_deref(), Some("premium"));
        assert_eq!(request.months, Some(3));
    }

    #[test]
    fn explicit_expiry_wins_over_months() {
        let expiry = Utc::now() + Duration::days(10);
        let request = SubscriptionRequest {
            plan: Some("premium".to_string()),
            months: Some(12),
            expiry: Some(expiry),
        };
        assert_eq!(subscription_end(&request).unwrap(), expiry);
    }

    #[test]
    fn months_default_to_one() {
        let request = SubscriptionRequest {
            plan: Some("premium".to_string()),
            months: None,
            expiry: None,
        };
        let end = subscription_end(&request).unwrap();
        let days = (end - Utc::now()).num_days();
        assert!((27..=32).contains(&days), "one month out, got {days} days");
    }

    #[test]
    fn multi_month_subscriptions_extend_further() {
        let request = SubscriptionRequest {
            plan: Some("premium".to_string()),
            months: Some(6),
            expiry: None,
        };
        let end = subscription_end(&request).unwrap();
        assert!((end - Utc::now()).num_days() >= 180);
    }
}
