//! Error reporter
//!
//! Failures are tagged on the response with a [`FailureReport`] extension by
//! whoever produced the fallback page (route fallback, `AppError`, panic
//! catcher). The [`ErrorReporter`] interceptor removes the tag and writes one
//! line to the `errors` logger. Logging problems never change the response.

use std::any::Any;
use std::sync::Arc;

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use songbook_core::{loggers, LoggerTaxonomy};
use tower_http::catch_panic::ResponseForPanic;

use super::interceptor::{RequestSnapshot, ResponseInterceptor};
use crate::views;

/// What went wrong while producing a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReport {
    /// No route matched
    NotFound,
    /// A handler returned an error
    HandlerError(String),
    /// A handler panicked
    Panic(String),
}

impl FailureReport {
    /// Attach this report to a response
    pub fn attach(self, mut response: Response) -> Response {
        response.extensions_mut().insert(self);
        response
    }
}

/// Route fallback: 404 page tagged for the reporter
pub async fn not_found() -> Response {
    let response = (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response();
    FailureReport::NotFound.attach(response)
}

/// 500 page tagged with a handler error
pub fn server_error(message: impl Into<String>) -> Response {
    let response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(views::server_error_page()),
    )
        .into_response();
    FailureReport::HandlerError(message.into()).attach(response)
}

/// Panic handler for `CatchPanicLayer`: same 500 page, tagged as a panic
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicReporter;

impl ResponseForPanic for PanicReporter {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let message = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "unknown panic payload".to_string()
        };

        let response = (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(views::server_error_page()),
        )
            .into_response();
        FailureReport::Panic(message).attach(response)
    }
}

/// Interceptor writing tagged failures to the `errors` logger
pub struct ErrorReporter {
    taxonomy: Arc<LoggerTaxonomy>,
}

impl ErrorReporter {
    pub fn new(taxonomy: Arc<LoggerTaxonomy>) -> Self {
        Self { taxonomy }
    }
}

impl ResponseInterceptor for ErrorReporter {
    fn name(&self) -> &'static str {
        "error_reporter"
    }

    fn on_response(&self, request: &RequestSnapshot, mut response: Response) -> Response {
        let Some(report) = response.extensions_mut().remove::<FailureReport>() else {
            return response;
        };

        let log = self.taxonomy.logger(loggers::ERRORS);
        match report {
            FailureReport::NotFound => {
                log.info(format!(
                    "Page not Found: {} (check that the page exists)",
                    request.path()
                ));
            }
            FailureReport::HandlerError(message) => {
                log.error(format!(
                    "{} {} failed: {}",
                    request.method,
                    request.path(),
                    message
                ));
            }
            FailureReport::Panic(message) => {
                log.critical(format!(
                    "{} {} panicked: {}",
                    request.method,
                    request.path(),
                    message
                ));
            }
        }
        response
    }
}
