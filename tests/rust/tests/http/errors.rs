//! Failures reported on the errors log

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use pretty_assertions::assert_eq;
use songbook_web::DependenciesBuilder;
use tests::app::{body_text, TestApp};
use tests::mocks::{failing_taxonomy, FailingSongRepository, FailingUserRepository};

async fn boom() -> &'static str {
    panic!("boom")
}

#[tokio::test]
async fn test_unknown_page_is_reported_at_info() {
    let app = TestApp::new();
    let response = app.get("/page5").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Page not found"));

    let errors = app.log_lines("errors.log");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("[INFO] errors: Page not Found: /page5"));
}

#[tokio::test]
async fn test_storage_failure_is_reported_at_error() {
    let app = TestApp::build(
        DependenciesBuilder::new().with_song_repo(Arc::new(FailingSongRepository)),
        |routes| routes,
    );

    let response = app.get("/songs").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("Something went wrong"));

    let errors = app.log_lines("errors.log");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("[ERROR] errors: GET /songs failed: storage failure: disk I/O error"));

    // The request line still records the final status
    assert!(app.log_lines("request.log")[0].contains("status: 500"));
}

#[tokio::test]
async fn test_panic_is_reported_at_critical() {
    let app = TestApp::build(DependenciesBuilder::new(), |routes| {
        routes.route("/boom", get(boom))
    });

    let response = app.get("/boom").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let errors = app.log_lines("errors.log");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("[CRITICAL] errors: GET /boom panicked: boom"));
    assert_eq!(app.log_lines("request.log").len(), 1);
}

#[tokio::test]
async fn test_user_lookup_failure_is_anonymous() {
    let app = TestApp::build(
        DependenciesBuilder::new().with_user_repo(Arc::new(FailingUserRepository)),
        |routes| routes,
    );
    let token = app.state.auth.sessions().create(1).unwrap();

    let response = app
        .get_as("/about", &format!("songbook_session={}", token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(r#"href="/login""#));

    let app_log = app.log_lines("app.log");
    assert_eq!(app_log.len(), 1);
    assert!(app_log[0].contains("[WARNING] app: Failed to load session user"));
    assert!(app.log_lines("errors.log").is_empty());
}

#[tokio::test]
async fn test_broken_log_sinks_do_not_change_responses() {
    let taxonomy = failing_taxonomy();
    let app = TestApp::with_taxonomy(taxonomy.clone());

    let response = app.get("/page5").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Page not found"));

    let response = app.get("/about").await;
    assert_eq!(response.status(), StatusCode::OK);

    // One errors line for the 404, one request line for each request
    assert!(taxonomy.failed_writes() >= 3);
}
