//! Registration, login and protected pages

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use tests::app::{body_text, location, TestApp};

const PASSWORD: &str = "correct horse";

#[tokio::test]
async fn test_register_login_dashboard() {
    let app = TestApp::new();
    let session = app.login_new_user("singer@example.com", PASSWORD).await;

    let response = app.get_as("/dashboard", &session).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Signed in as singer@example.com"));

    let app_log = app.log_lines("app.log");
    assert!(app_log.iter().any(|l| l.contains("Registered new user singer@example.com")));
    assert!(app_log.iter().any(|l| l.contains("User singer@example.com logged in")));
}

#[tokio::test]
async fn test_dashboard_requires_login() {
    let app = TestApp::new();
    let response = app.get("/dashboard").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::new();
    let session = app.login_new_user("bye@example.com", PASSWORD).await;

    let response = app.get_as("/logout", &session).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let response = app.get_as("/dashboard", &session).await;
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn test_invalid_registration() {
    let app = TestApp::new();

    let response = app
        .post_form(
            "/register",
            &[("email", "nope"), ("password", PASSWORD), ("confirm", PASSWORD)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("valid email"));

    let response = app
        .post_form(
            "/register",
            &[
                ("email", "a@example.com"),
                ("password", PASSWORD),
                ("confirm", "something else"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.login_new_user("taken@example.com", PASSWORD).await;

    let response = app
        .post_form(
            "/register",
            &[
                ("email", "Taken@Example.com"),
                ("password", PASSWORD),
                ("confirm", PASSWORD),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.login_new_user("user@example.com", PASSWORD).await;

    let response = app
        .post_form(
            "/login",
            &[("email", "user@example.com"), ("password", "wrong password")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app
        .log_lines("app.log")
        .iter()
        .any(|l| l.contains("[WARNING] app: Failed login for user@example.com")));
}
