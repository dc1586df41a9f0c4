use pointcam_core::media::MediaServerConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Whether the webcam list is reachable when no `video_config` row exists.
    pub video_enabled: bool,
    /// Period of the background status sweep; `0` disables it.
    pub status_sweep_interval_secs: u64,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    /// Media server location and signing key.
    pub media: MediaServerConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                    |
    /// |------------------------------|----------------------------|
    /// | `HOST`                       | `0.0.0.0`                  |
    /// | `PORT`                       | `3000`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                       |
    /// | `VIDEO_ENABLED`              | `false`                    |
    /// | `STATUS_SWEEP_INTERVAL_SECS` | `0`                        |
    /// | `MEDIASERVER_URL`            | `localhost`                |
    /// | `MEDIASERVER_HTTP_PORT`      | `80`                       |
    /// | `MEDIASERVER_RTMP_PORT`      | `1935`                     |
    /// | `MEDIASERVER_KEY`            | empty                      |
    ///
    /// # Panics
    ///
    /// Panics on unparseable numbers or booleans, and when `JWT_SECRET` is
    /// missing.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let video_enabled = parse_flag(
            &std::env::var("VIDEO_ENABLED").unwrap_or_default(),
        )
        .expect("VIDEO_ENABLED must be true/false, 1/0 or yes/no");

        let status_sweep_interval_secs: u64 = std::env::var("STATUS_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("STATUS_SWEEP_INTERVAL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            video_enabled,
            status_sweep_interval_secs,
            jwt: JwtConfig::from_env(),
            media: media_server_from_env(),
        }
    }
}

fn media_server_from_env() -> MediaServerConfig {
    let http_port: u16 = std::env::var("MEDIASERVER_HTTP_PORT")
        .unwrap_or_else(|_| "80".into())
        .parse()
        .expect("MEDIASERVER_HTTP_PORT must be a valid u16");

    let rtmp_port: u16 = std::env::var("MEDIASERVER_RTMP_PORT")
        .unwrap_or_else(|_| "1935".into())
        .parse()
        .expect("MEDIASERVER_RTMP_PORT must be a valid u16");

    MediaServerConfig {
        host: std::env::var("MEDIASERVER_URL").unwrap_or_else(|_| "localhost".into()),
        http_port,
        rtmp_port,
        secret: std::env::var("MEDIASERVER_KEY").unwrap_or_default(),
    }
}

/// Parse a boolean environment value. Empty means `false`.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Some(false),
        "1" | "true" | "yes" | "on" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag(" 1 "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
