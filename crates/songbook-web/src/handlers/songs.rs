//! Song list and CSV upload

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use songbook_core::{loggers, parse_songs};

use super::upload::read_csv_upload;
use crate::auth::{CurrentUser, RequireUser};
use crate::error::AppError;
use crate::server::AppState;
use crate::views;

/// Songs shown per page
pub const SONGS_PER_PAGE: u32 = 10;

const SONG_COLUMNS: &str = "Name,Artist,Year,Genre";

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page; anything unparsable or zero means the first page
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }
}

/// Number of pages needed for `total` items
pub fn total_pages(total: i64, per_page: u32) -> u32 {
    let per_page = i64::from(per_page.max(1));
    u32::try_from((total.max(0) + per_page - 1) / per_page).unwrap_or(u32::MAX)
}

pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let page = query.page();
    let songs = state.songs.list_page(page, SONGS_PER_PAGE).await?;
    let total = state.songs.count().await?;

    Ok(Html(views::songs_page(
        user.user(),
        &songs,
        page,
        total_pages(total, SONGS_PER_PAGE),
    )))
}

pub async fn upload_form(RequireUser(user): RequireUser) -> Html<String> {
    Html(views::upload_page(
        &user,
        "Upload songs",
        "/songs/upload",
        SONG_COLUMNS,
        None,
    ))
}

pub async fn upload(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let log = state.logger(loggers::CSV_UPLOAD);

    let result = async {
        let upload = read_csv_upload(multipart).await?;
        let songs = parse_songs(upload.contents.as_ref())?;
        let stored = state.songs.insert_many(user.id, &songs).await?;
        Ok::<_, AppError>((upload.file_name, stored))
    }
    .await;

    match result {
        Ok((file_name, stored)) => {
            log.info(format!(
                "{} uploaded {} songs from {}",
                user.email, stored, file_name
            ));
            Ok(Redirect::to("/songs").into_response())
        }
        Err(e) if e.status() == StatusCode::BAD_REQUEST => {
            log.warning(format!("Rejected song upload from {}: {}", user.email, e));
            let page = views::upload_page(
                &user,
                "Upload songs",
                "/songs/upload",
                SONG_COLUMNS,
                Some(&e.to_string()),
            );
            Ok((StatusCode::BAD_REQUEST, Html(page)).into_response())
        }
        Err(e) => Err(e),
    }
}
