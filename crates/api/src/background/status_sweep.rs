//! Periodic webcam status sweep.
//!
//! Runs the same sweep as `GET /pointwebcamlist/check-status` on a fixed
//! interval using `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use pointcam_core::monitor::StatusProbe;
use sqlx::PgPool;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::monitor::run_sweep;

/// Run the status sweep loop every `interval` until `cancel` is triggered.
///
/// A sweep that is in progress when `cancel` fires runs to completion.
pub async fn run(
    pool: PgPool,
    probe: Arc<dyn StatusProbe>,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = interval.as_secs(), "Status sweep job started");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Status sweep job stopping");
                break;
            }
            _ = ticker.tick() => {
                match run_sweep(&pool, probe.as_ref()).await {
                    Ok(report) => {
                        tracing::debug!(checked = report.len(), "Status sweep: done");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Status sweep: failed to load webcams");
                    }
                }
            }
        }
    }
}
