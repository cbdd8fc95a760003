mod common;

use common::spawn_app;

#[tokio::test]
async fn home_renders_html() {
    let address = spawn_app(false).await;

    let response = reqwest::Client::new()
        .get(format!("{address}/"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "{content_type}");

    let body = response.text().await.unwrap();
    assert!(!body.is_empty());
    assert!(body.contains("<html"));
    assert!(body.contains("/status"));
}

#[tokio::test]
async fn home_does_not_depend_on_database() {
    let up = spawn_app(true).await;
    let down = spawn_app(false).await;
    let client = reqwest::Client::new();

    let up_status = client.get(format!("{up}/")).send().await.unwrap().status();
    let down_status = client.get(format!("{down}/")).send().await.unwrap().status();

    assert_eq!(up_status, reqwest::StatusCode::OK);
    assert_eq!(down_status, reqwest::StatusCode::OK);
}

#[tokio::test]
async fn serves_static_files() {
    let address = spawn_app(true).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{address}/static/hello.txt"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "pulse static fixture\n");

    let missing = client
        .get(format!("{address}/static/missing.css"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}
