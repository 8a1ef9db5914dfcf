//! Shared request-handler state.

use std::path::PathBuf;
use std::sync::Arc;

use crate::pinning::PinningClient;
use crate::storage::Storage;

/// State injected into every request handler.
///
/// The storage backend and the pinning client sit behind trait objects so
/// the server can run against Postgres or the in-memory store, and so tests
/// can substitute a stub pinning service.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    /// Absent when no pinning credentials were configured.
    pub pinning: Option<Arc<dyn PinningClient>>,
    pub uploads_dir: PathBuf,
}
