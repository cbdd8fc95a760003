#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Once};

use pulse::config::{ServerSettings, Settings};
use pulse::services::db_health::{DbProbe, StaticProbe};
use tokio::net::TcpListener;

pub fn init_tracing_once() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("pulse=debug")
            .with_test_writer()
            .init();
    });
}

pub fn test_server_settings() -> ServerSettings {
    ServerSettings {
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir: PathBuf::from("tests/data/static"),
    }
}

/// Settings pointing at a database nobody listens on.
pub fn unreachable_db_settings() -> Settings {
    Settings::from_toml(
        r#"
        [database]
        database = "pulse"
        user = "postgres"
        password = "postgres"
        host = "127.0.0.1"
        port = 1
        connect_timeout_secs = 2

        [server]
        host = "127.0.0.1"
        port = 0
        static_dir = "tests/data/static"
        "#,
    )
    .expect("Failed to parse test settings")
}

/// Spawns the application with a probe that always answers `db_connected`.
///
/// Returned address format: `http://127.0.0.1:8492`
pub async fn spawn_app(db_connected: bool) -> String {
    spawn_app_with_probe(Arc::new(StaticProbe(db_connected))).await
}

pub async fn spawn_app_with_probe(probe: Arc<dyn DbProbe>) -> String {
    init_tracing_once();
    serve(pulse::app_with_probe(&test_server_settings(), probe)).await
}

/// Spawns the application wired exactly as the binary does, from `settings`.
pub async fn spawn_app_with_settings(settings: &Settings) -> String {
    init_tracing_once();
    serve(pulse::app(settings)).await
}

async fn serve(app: axum::Router) -> String {
    // Randomly choose an available port
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port at localhost");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let address = format!("http://127.0.0.1:{port}");

    // Wait for server to be ready
    let client = reqwest::Client::new();
    for _ in 0..10 {
        if client.get(format!("{address}/")).send().await.is_ok() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }

    address
}
