//! Webcam status sweep over HTTP.
//!
//! [`run_sweep`] is shared by the `check-status` endpoint and the periodic
//! background job.

use std::collections::BTreeMap;

use async_trait::async_trait;
use pointcam_core::monitor::{check_status, ProbeOutcome, StatusProbe, StatusReport, PROBE_TIMEOUT};
use pointcam_core::types::DbId;
use pointcam_db::repositories::WebcamRepo;
use sqlx::PgPool;

/// Probes `http://{ip}:{port}` and treats any response as reachable.
#[derive(Debug, Clone)]
pub struct HttpStatusProbe {
    client: reqwest::Client,
}

impl HttpStatusProbe {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl StatusProbe for HttpStatusProbe {
    async fn probe(&self, ip: &str, port: i32) -> ProbeOutcome {
        match self.client.get(format!("http://{ip}:{port}")).send().await {
            Ok(_) => ProbeOutcome::Reachable,
            Err(e) => {
                tracing::debug!(ip, port, error = %e, "Webcam probe failed");
                ProbeOutcome::Unreachable
            }
        }
    }
}

/// Probe every webcam that may be live, persist each new status and report
/// it by webcam id.
///
/// Webcams are visited one at a time. A failed status write is logged and
/// the sweep moves on.
pub async fn run_sweep(
    pool: &PgPool,
    probe: &dyn StatusProbe,
) -> Result<BTreeMap<DbId, StatusReport>, sqlx::Error> {
    let webcams = WebcamRepo::list_sweep_targets(pool).await?;
    let mut report = BTreeMap::new();

    for webcam in webcams {
        let target = webcam.sweep_target();
        let status = check_status(probe, &target).await;

        if let Err(e) = WebcamRepo::update_online(pool, target.id, status).await {
            tracing::error!(webcam_id = target.id, error = %e, "Failed to store webcam status");
        }
        if status != target.online {
            tracing::info!(
                webcam_id = target.id,
                from = target.online.name(),
                to = status.name(),
                "Webcam status changed"
            );
        }
        report.insert(target.id, StatusReport::new(status, target.ip));
    }

    tracing::debug!(checked = report.len(), "Status sweep finished");
    Ok(report)
}
