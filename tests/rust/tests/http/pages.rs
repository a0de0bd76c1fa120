//! Content pages

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use tests::app::{body_text, TestApp};

#[tokio::test]
async fn test_index_links() {
    let app = TestApp::new();
    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    for href in ["/about", "/welcome", "/login", "/register"] {
        assert!(html.contains(&format!(r#"href="{}""#, href)), "missing {}", href);
    }
}

#[tokio::test]
async fn test_static_pages() {
    let app = TestApp::new();
    for (path, title) in [
        ("/about", "<title>About | Songbook</title>"),
        ("/welcome", "<title>Welcome | Songbook</title>"),
        ("/register", "<title>Register | Songbook</title>"),
        ("/login", "<title>Login | Songbook</title>"),
    ] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", path);
        assert!(body_text(response).await.contains(title), "{}", path);
    }
}

#[tokio::test]
async fn test_song_list_tolerates_bad_page() {
    let app = TestApp::new();
    let response = app.get("/songs?page=banana").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Page 1 of 1"));
}
