//! Demo authentication endpoints.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::routes::DEMO_USER_ID;
use crate::state::AppState;

/// Login request body. Fields are optional so missing values map to a 400
/// with a useful message instead of a body-rejection error.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user", get(current_user))
        .route("/auth/login", post(login))
}

/// GET /api/user
///
/// Returns the demo user, or JSON null when nobody has logged in yet.
async fn current_user(State(state): State<AppState>) -> Result<Json<Option<User>>, AppError> {
    let user = state.storage.user(DEMO_USER_ID).await?;
    Ok(Json(user))
}

/// POST /api/auth/login
///
/// Demo login: an unknown username registers a new account on the spot; a
/// known username must present the stored password (plaintext equality, a
/// deliberate flaw of this demo). Either way the user comes back flagged
/// authenticated.
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>, AppError> {
    let username = request
        .username
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Validation("username and password are required".to_string()))?;
    let password = request
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("username and password are required".to_string()))?;

    let user = match state.storage.user_by_username(&username).await? {
        Some(existing) => {
            if existing.password != password {
                return Err(AppError::Auth("invalid credentials".to_string()));
            }
            existing
        }
        None => {
            state
                .storage
                .create_user(NewUser { username, password })
                .await?
        }
    };

    let user = state
        .storage
        .set_authenticated(user.id, true)
        .await?
        .ok_or_else(|| AppError::Internal("user vanished during login".to_string()))?;

    Ok(Json(user))
}
