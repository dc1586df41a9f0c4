use std::sync::Arc;

use pointcam_core::monitor::StatusProbe;
use pointcam_mediaserver::ArchiveInventory;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pointcam_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Media server archive inventory.
    pub inventory: Arc<dyn ArchiveInventory>,
    /// Webcam reachability probe used by status sweeps.
    pub probe: Arc<dyn StatusProbe>,
}
