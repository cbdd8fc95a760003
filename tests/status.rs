mod common;

use std::sync::Arc;
use std::time::Duration;

use pulse::models::StatusResponse;
use pulse::services::db_health::PgProbe;
use serde_json::Value;
use sqlx::PgPool;

use common::{spawn_app, spawn_app_with_probe, spawn_app_with_settings, unreachable_db_settings};

async fn get_status(client: &reqwest::Client, address: &str) -> (reqwest::StatusCode, Value) {
    let response = client
        .get(format!("{address}/status"))
        .send()
        .await
        .expect("Failed to execute request");
    let status = response.status();
    let body = response.json().await.expect("Body should be JSON");
    (status, body)
}

#[tokio::test]
async fn status_reports_ok_with_reachable_database() {
    let address = spawn_app(true).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{address}/status"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );

    let body: StatusResponse = response.json().await.unwrap();
    assert_eq!(body.status, "ok");
    assert!(body.db_connected);
    assert!(body.timestamp > 1_600_000_000.0);
}

#[tokio::test]
async fn status_has_exactly_three_fields() {
    let address = spawn_app(true).await;
    let (_, body) = get_status(&reqwest::Client::new(), &address).await;

    let fields = body.as_object().expect("Body should be an object");
    assert_eq!(fields.len(), 3);
    assert!(fields["status"].is_string());
    assert!(fields["db_connected"].is_boolean());
    assert!(fields["timestamp"].is_f64());
}

#[tokio::test]
async fn status_is_ok_when_probe_fails() {
    let address = spawn_app(false).await;
    let (status, body) = get_status(&reqwest::Client::new(), &address).await;

    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_connected"], false);
}

#[tokio::test]
async fn status_is_ok_with_unreachable_database_host() {
    let address = spawn_app_with_settings(&unreachable_db_settings()).await;
    let (status, body) = get_status(&reqwest::Client::new(), &address).await;

    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_connected"], false);
}

#[tokio::test]
async fn status_timestamps_never_decrease() {
    let address = spawn_app(true).await;
    let client = reqwest::Client::new();

    let mut last = 0.0;
    for _ in 0..20 {
        let (_, body) = get_status(&client, &address).await;
        let timestamp = body["timestamp"].as_f64().unwrap();
        assert!(timestamp >= last, "{timestamp} < {last}");
        last = timestamp;
    }
}

#[tokio::test]
async fn unknown_path_is_json_404() {
    let address = spawn_app(true).await;

    let response = reqwest::Client::new()
        .get(format!("{address}/nope"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "not found");
}

#[sqlx::test(migrations = false)]
async fn status_reports_live_database(pool: PgPool) {
    let options = (*pool.connect_options()).clone();
    let probe = Arc::new(PgProbe::new(options, Duration::from_secs(5)));
    let address = spawn_app_with_probe(probe).await;

    let (status, body) = get_status(&reqwest::Client::new(), &address).await;

    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_connected"], true);
}
