//! Request extractors resolving the session user

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use songbook_core::{loggers, User};

use super::session::session_token;
use crate::server::AppState;

/// The logged-in user, if any.
///
/// Storage errors while loading the user are logged on `app` and treated as
/// anonymous.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Ok(Self(None));
        };

        match state.auth.user_for_token(&token).await {
            Ok(user) => Ok(Self(user)),
            Err(e) => {
                state
                    .logger(loggers::APP)
                    .warning(format!("Failed to load session user: {:#}", e));
                Ok(Self(None))
            }
        }
    }
}

/// A logged-in user; anonymous requests are redirected to `/login`.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(CurrentUser(Some(user))) => Ok(Self(user)),
            _ => Err(Redirect::to("/login")),
        }
    }
}
