#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use pointcam_api::auth::jwt::{generate_access_token, JwtConfig};
use pointcam_api::config::ServerConfig;
use pointcam_api::router::build_app_router;
use pointcam_api::state::AppState;
use pointcam_core::media::MediaServerConfig;
use pointcam_core::monitor::{ProbeOutcome, StatusProbe};
use pointcam_core::roles::{ROLE_ADMIN, ROLE_USER};
use pointcam_mediaserver::{ArchiveInventory, InventoryError};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

pub const MEDIA_SECRET: &str = "s3cret";

/// Build a test `ServerConfig` with safe defaults and video switched on.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        video_enabled: true,
        status_sweep_interval_secs: 0,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        media: MediaServerConfig {
            host: "media.local".to_string(),
            http_port: 8080,
            rtmp_port: 1935,
            secret: MEDIA_SECRET.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Collaborator fakes
// ---------------------------------------------------------------------------

/// Canned media server inventory.
#[derive(Debug, Default, Clone)]
pub struct FakeInventory {
    pub dates: Vec<NaiveDate>,
    pub hours: Vec<String>,
    /// `DD.MM.YYYY` -> point ids. Dates not listed fail.
    pub points: HashMap<String, Vec<String>>,
}

#[async_trait]
impl ArchiveInventory for FakeInventory {
    async fn archive_dates(&self) -> Vec<NaiveDate> {
        self.dates.clone()
    }

    async fn archive_hours(&self, _webcam: &str, _rec_date: Option<&str>) -> Vec<String> {
        self.hours.clone()
    }

    async fn points_by_date(&self, rec_date: Option<&str>) -> Result<Vec<String>, InventoryError> {
        let date = rec_date.unwrap_or_default();
        self.points.get(date).cloned().ok_or_else(|| InventoryError::Api {
            status: 500,
            body: format!("no archive for {date}"),
        })
    }
}

/// Reports the listed addresses as reachable and everything else as not.
#[derive(Debug, Default, Clone)]
pub struct FakeProbe {
    pub reachable: HashSet<String>,
}

#[async_trait]
impl StatusProbe for FakeProbe {
    async fn probe(&self, ip: &str, _port: i32) -> ProbeOutcome {
        if self.reachable.contains(ip) {
            ProbeOutcome::Reachable
        } else {
            ProbeOutcome::Unreachable
        }
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build the full application router with all middleware layers, using the
/// given database pool and collaborators.
pub fn build_app(
    pool: PgPool,
    config: ServerConfig,
    inventory: FakeInventory,
    probe: FakeProbe,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        inventory: Arc::new(inventory),
        probe: Arc::new(probe),
    };
    build_app_router(state, &config)
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_app(
        pool,
        test_config(),
        FakeInventory::default(),
        FakeProbe::default(),
    )
}

/// A pool that never connects; any query fails after a short wait.
pub fn unreachable_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy("postgres://pointcam@127.0.0.1:1/pointcam")
        .expect("lazy pool")
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

pub fn token(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).expect("token")
}

pub fn admin_token(user_id: i64) -> String {
    token(user_id, ROLE_ADMIN)
}

pub fn user_token(user_id: i64) -> String {
    token(user_id, ROLE_USER)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Percent-encode a query parameter value.
pub fn enc(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

pub struct Seed {
    pub admin_id: i64,
    pub user_id: i64,
    pub p100: i64,
    pub ivanov: i64,
    pub kassa: i64,
    pub vhod: i64,
    pub sklad: i64,
}

async fn insert_id(pool: &PgPool, sql: &str) -> i64 {
    let (id,): (i64,) = sqlx::query_as(sql).fetch_one(pool).await.unwrap();
    id
}

/// Two points in two cities, three webcams, one responsible person and two
/// users.
pub async fn seed(pool: &PgPool) -> Seed {
    let admin_id = insert_id(
        pool,
        "INSERT INTO users (username, role) VALUES ('boss', 'admin') RETURNING id",
    )
    .await;
    let user_id = insert_id(pool, "INSERT INTO users (username) VALUES ('clerk') RETURNING id").await;
    let moscow = insert_id(pool, "INSERT INTO cities (name) VALUES ('Москва') RETURNING id").await;
    let kazan = insert_id(pool, "INSERT INTO cities (name) VALUES ('Казань') RETURNING id").await;
    let p100 = insert_id(
        pool,
        &format!(
            "INSERT INTO points (spid, name, address, city_id) \
             VALUES ('100', 'Магазин 1', 'ул. Ленина, 1', {moscow}) RETURNING id"
        ),
    )
    .await;
    let p200 = insert_id(
        pool,
        &format!(
            "INSERT INTO points (spid, name, address, city_id) \
             VALUES ('200', 'Магазин 2', 'ул. Мира, 2', {kazan}) RETURNING id"
        ),
    )
    .await;
    let ivanov = insert_id(
        pool,
        "INSERT INTO profiles (first_name, last_name) VALUES ('Иван', 'Иванов') RETURNING id",
    )
    .await;

    let mut ids = Vec::new();
    for (point, name, slug, ip, online, responsible) in [
        (p100, "Касса", "kassa", "10.0.0.1", 10i16, Some(ivanov)),
        (p100, "Вход", "vhod", "0.0.0.0", 0, None),
        (p200, "Склад", "sklad", "10.0.0.3", 20, Some(ivanov)),
    ] {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO webcams (point_id, name, slug, ip, online, responsible_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(point)
        .bind(name)
        .bind(slug)
        .bind(ip)
        .bind(online)
        .bind(responsible)
        .fetch_one(pool)
        .await
        .unwrap();
        ids.push(id);
    }

    Seed {
        admin_id,
        user_id,
        p100,
        ivanov,
        kassa: ids[0],
        vhod: ids[1],
        sklad: ids[2],
    }
}
