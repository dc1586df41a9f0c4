mod common;

use axum::http::StatusCode;

/// Health reports degraded when the database cannot be reached.
#[tokio::test]
async fn health_degraded_without_database() {
    let app = common::build_test_app(common::unreachable_pool());
    let response = common::get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
    assert!(json["version"].is_string());
}

/// Every response carries an `x-request-id` header.
#[tokio::test]
async fn responses_carry_request_id() {
    let app = common::build_test_app(common::unreachable_pool());
    let response = common::get(app, "/health").await;
    let id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header");
    assert!(!id.is_empty());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app(common::unreachable_pool());
    let response = common::get(app, "/api/v1/nothing-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn health_ok_with_database(pool: sqlx::PgPool) {
    let app = common::build_test_app(pool);
    let json = common::body_json(common::get(app, "/health").await).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
