//! One request line per handled request

use axum::body::Body;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use tests::app::TestApp;

#[tokio::test]
async fn test_request_line_fields() {
    let app = TestApp::new();
    let response = app.get("/about").await;
    assert_eq!(response.status(), StatusCode::OK);

    let lines = app.log_lines("request.log");
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("[INFO] request: method: GET, path: /about, status: 200"));
    assert!(lines[0].contains("ip: 192.0.2.10"));
    assert!(!lines[0].contains("request_id"));
}

#[tokio::test]
async fn test_assets_are_not_logged() {
    let app = TestApp::new();

    app.get("/favicon.ico").await;
    app.get("/static/css/site.css").await;
    app.get("/bootstrap/css/bootstrap.min.css").await;

    assert!(app.log_lines("request.log").is_empty());
}

#[tokio::test]
async fn test_forwarded_for_wins_over_peer() {
    let app = TestApp::new();
    app.send(
        Request::get("/welcome")
            .header("X-Forwarded-For", "203.0.113.5")
            .header("Host", "songs.example.com:8443")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    let line = app.log_lines("request.log").remove(0);
    assert!(line.contains("ip: 203.0.113.5"));
    assert!(line.contains("host: songs.example.com,"));
}

#[tokio::test]
async fn test_request_id_is_last_field() {
    let app = TestApp::new();
    app.send(
        Request::get("/songs?page=2&sort=year")
            .header("X-Request-ID", "abc-123")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    let line = app.log_lines("request.log").remove(0);
    assert!(line.contains("params: {page: 2, sort: year}"));
    assert!(line.ends_with(", request_id: abc-123"));
}

#[tokio::test]
async fn test_every_request_gets_exactly_one_line() {
    let app = TestApp::new();
    for path in ["/", "/about", "/page5", "/health", "/api/songs"] {
        app.get(path).await;
    }

    let lines = app.log_lines("request.log");
    assert_eq!(lines.len(), 5);
    assert!(lines[2].contains("path: /page5, status: 404"));
}
