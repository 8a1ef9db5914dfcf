//! HeritageVault Server - API for artifact registration and verification
//!
//! This crate provides the REST API server for HeritageVault's artifact
//! catalog: upload, listing, content verification against upload-time
//! digests, demo authentication and subscriptions, and the relay to the
//! external pinning service.

pub mod config;
pub mod error;
pub mod models;
pub mod pinning;
pub mod routes;
pub mod state;
pub mod storage;

pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
