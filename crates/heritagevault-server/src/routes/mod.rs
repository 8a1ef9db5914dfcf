//! API routes for the HeritageVault server.

pub mod artifacts;
pub mod subscriptions;
pub mod uploads;
pub mod users;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Identifier of the demo user that anonymous flows operate on.
///
/// The first account ever created gets id 1, matching the demo front end's
/// assumption that "the user" is always record one.
pub(crate) const DEMO_USER_ID: i32 = 1;

/// Creates the main router with all API routes and upload file serving.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(users::router())
        .merge(subscriptions::router())
        .merge(uploads::router())
        .nest("/artifacts", artifacts::router());

    Router::new()
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(&state.uploads_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
