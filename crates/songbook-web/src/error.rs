//! Application error type returned by handlers

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use songbook_core::CsvImportError;
use thiserror::Error;

use crate::auth::AuthError;
use crate::logging::server_error;
use crate::views;

/// Handler failure. Client errors render an error page with a 4xx status;
/// everything else becomes the 500 page and is reported on the `errors` logger.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("invalid CSV file: {0}")]
    Csv(#[from] CsvImportError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Csv(_) => StatusCode::BAD_REQUEST,
            Self::Auth(err) => err.status(),
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            return server_error(self.to_string());
        }

        let heading = status.canonical_reason().unwrap_or("Error");
        (status, Html(views::error_page(heading, &self.to_string()))).into_response()
    }
}
