//! Webcam reachability checks.
//!
//! The network side lives behind [`StatusProbe`] so the sweep logic can be
//! exercised without sockets. A probe only reports whether *any* HTTP
//! response came back; status codes are irrelevant.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::status::{StatusCode, WebcamStatus};
use crate::types::DbId;

/// Address meaning "no hardware configured".
pub const SENTINEL_IP: &str = "0.0.0.0";

/// Default camera HTTP port.
pub const DEFAULT_PORT: i32 = 554;

/// Upper bound on a single probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Some HTTP response arrived, whatever its status.
    Reachable,
    /// Timeout, refused connection, DNS failure and the like.
    Unreachable,
}

#[async_trait]
pub trait StatusProbe: Send + Sync {
    async fn probe(&self, ip: &str, port: i32) -> ProbeOutcome;
}

/// The fields of a webcam the sweep needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepTarget {
    pub id: DbId,
    pub ip: String,
    pub port: i32,
    pub online: WebcamStatus,
}

impl SweepTarget {
    pub fn has_sentinel_ip(&self) -> bool {
        self.ip == SENTINEL_IP
    }

    /// Unconfigured cameras already marked off are not worth visiting.
    pub fn needs_check(&self) -> bool {
        !(self.has_sentinel_ip() && self.online == WebcamStatus::Off)
    }
}

/// Per-webcam result of a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub status: WebcamStatus,
    /// Database code of `status`.
    pub code: StatusCode,
    pub status_name: &'static str,
    pub ip: String,
}

impl StatusReport {
    pub fn new(status: WebcamStatus, ip: impl Into<String>) -> Self {
        Self {
            status,
            code: status.code(),
            status_name: status.label(),
            ip: ip.into(),
        }
    }
}

/// Determine the status of one webcam. Sentinel addresses are never probed.
pub async fn check_status(probe: &dyn StatusProbe, target: &SweepTarget) -> WebcamStatus {
    if target.has_sentinel_ip() {
        return WebcamStatus::Off;
    }
    match probe.probe(&target.ip, target.port).await {
        ProbeOutcome::Reachable => WebcamStatus::On,
        ProbeOutcome::Unreachable => WebcamStatus::Error,
    }
}
