//! Map locations

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use songbook_core::{loggers, parse_locations};

use super::upload::read_csv_upload;
use crate::auth::{CurrentUser, RequireUser};
use crate::error::AppError;
use crate::server::AppState;
use crate::views;

pub async fn map(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Html<String>, AppError> {
    let locations = state.locations.list().await?;
    Ok(Html(views::map_page(user.user(), &locations)))
}

pub async fn upload_locations(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let log = state.logger(loggers::CSV_UPLOAD);

    let result = async {
        let upload = read_csv_upload(multipart).await?;
        let locations = parse_locations(upload.contents.as_ref())?;
        let stored = state.locations.insert_many(user.id, &locations).await?;
        Ok::<_, AppError>((upload.file_name, stored))
    }
    .await;

    match result {
        Ok((file_name, stored)) => {
            log.info(format!(
                "{} uploaded {} locations from {}",
                user.email, stored, file_name
            ));
            Ok(Redirect::to("/map").into_response())
        }
        Err(e) if e.status() == StatusCode::BAD_REQUEST => {
            log.warning(format!(
                "Rejected location upload from {}: {}",
                user.email, e
            ));
            let page = views::error_page("Upload failed", &e.to_string());
            Ok((StatusCode::BAD_REQUEST, Html(page)).into_response())
        }
        Err(e) => Err(e),
    }
}
