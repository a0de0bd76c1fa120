//! JSON API

use axum::extract::{Query, State};
use axum::response::Json;
use songbook_core::{Location, Song};

use super::songs::PageQuery;
use crate::error::AppError;
use crate::server::AppState;

/// Songs returned per API page
pub const API_PAGE_SIZE: u32 = 50;

pub async fn songs(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Song>>, AppError> {
    let songs = state.songs.list_page(query.page(), API_PAGE_SIZE).await?;
    Ok(Json(songs))
}

pub async fn locations(State(state): State<AppState>) -> Result<Json<Vec<Location>>, AppError> {
    Ok(Json(state.locations.list().await?))
}
