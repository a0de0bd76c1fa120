//! JSON endpoints

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tests::app::{body_text, TestApp};
use tests::fixtures::SONGS_CSV;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_api_lists_uploaded_songs() {
    let app = TestApp::new();
    let session = app.login_new_user("api@example.com", "correct horse").await;
    app.upload("/songs/upload", &session, "songs.csv", SONGS_CSV)
        .await;

    let response = app.get("/api/songs").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let songs = json.as_array().unwrap();
    assert_eq!(songs.len(), 3);
    assert_eq!(songs[0]["title"], "Clair de Lune");
    assert_eq!(songs[0]["year"], Value::Null);

    let response = app.get("/api/locations").await;
    assert_eq!(body_text(response).await, "[]");
}

#[tokio::test]
async fn test_api_allows_cross_origin() {
    let app = TestApp::new();
    let response = app
        .send(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/songs")
                .header("Origin", "https://maps.example.org")
                .header("Access-Control-Request-Method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
