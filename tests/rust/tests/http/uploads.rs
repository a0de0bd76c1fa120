//! CSV uploads

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use tests::app::{body_text, location, TestApp};
use tests::fixtures::{LOCATIONS_CSV, SONGS_CSV};

const PASSWORD: &str = "correct horse";

#[tokio::test]
async fn test_song_upload_stores_and_logs() {
    let app = TestApp::new();
    let session = app.login_new_user("up@example.com", PASSWORD).await;

    let response = app
        .upload("/songs/upload", &session, "songs.csv", SONGS_CSV)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/songs"));

    assert_eq!(app.state.songs.count().await.unwrap(), 3);

    let uploads = app.log_lines("csv_upload.log");
    assert_eq!(uploads.len(), 1);
    assert!(uploads[0].contains("[INFO] csv_upload: up@example.com uploaded 3 songs from songs.csv"));

    let html = body_text(app.get("/songs").await).await;
    assert!(html.contains("Blue in Green"));
    assert!(html.contains("Clair de Lune"));
}

#[tokio::test]
async fn test_invalid_song_csv_is_rejected() {
    let app = TestApp::new();
    let session = app.login_new_user("bad@example.com", PASSWORD).await;

    let response = app
        .upload("/songs/upload", &session, "songs.csv", "Title,Year\nNo artist,2000\n")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("missing required column"));
    assert_eq!(app.state.songs.count().await.unwrap(), 0);

    let uploads = app.log_lines("csv_upload.log");
    assert_eq!(uploads.len(), 1);
    assert!(uploads[0].contains("[WARNING] csv_upload: Rejected song upload"));
    assert!(app.log_lines("errors.log").is_empty());
}

#[tokio::test]
async fn test_non_csv_file_is_rejected() {
    let app = TestApp::new();
    let session = app.login_new_user("txt@example.com", PASSWORD).await;

    let response = app
        .upload("/songs/upload", &session, "songs.txt", SONGS_CSV)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_requires_login() {
    let app = TestApp::new();
    let response = app
        .upload("/songs/upload", "songbook_session=bogus", "songs.csv", SONGS_CSV)
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
    assert!(app.log_lines("csv_upload.log").is_empty());
}

#[tokio::test]
async fn test_location_upload_shows_on_map() {
    let app = TestApp::new();
    let session = app.login_new_user("map@example.com", PASSWORD).await;

    let response = app
        .upload("/locations/upload", &session, "places.csv", LOCATIONS_CSV)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/map"));

    let html = body_text(app.get("/map").await).await;
    assert!(html.contains("Lisbon"));
    assert!(html.contains("Reykjavik"));
    assert!(html.contains("2 locations"));
}
