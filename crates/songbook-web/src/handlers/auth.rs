//! Registration, login, logout and the dashboard

use axum::extract::{Form, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use songbook_core::loggers;
use tracing::debug;

use crate::auth::{clear_session_cookie, session_cookie, session_token, AuthError, RequireUser};
use crate::error::AppError;
use crate::server::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn register_form() -> Html<String> {
    Html(views::register_page("", None))
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    match state
        .auth
        .register(&form.email, &form.password, &form.confirm)
        .await
    {
        Ok(user) => {
            state
                .logger(loggers::APP)
                .info(format!("Registered new user {} (id {})", user.email, user.id));
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) if e.is_client_error() => {
            debug!("Registration rejected for {}: {}", form.email, e);
            let page = views::register_page(&form.email, Some(&e.to_string()));
            Ok((e.status(), Html(page)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login_form() -> Html<String> {
    Html(views::login_page("", None))
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match state.auth.login(&form.email, &form.password).await {
        Ok((user, token)) => {
            state
                .logger(loggers::APP)
                .info(format!("User {} logged in", user.email));
            let cookie = session_cookie(&token, state.config.secure_cookies);
            Ok(([(SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response())
        }
        Err(e @ (AuthError::InvalidCredentials | AuthError::Inactive)) => {
            state
                .logger(loggers::APP)
                .warning(format!("Failed login for {}: {}", form.email.trim(), e));
            let page = views::login_page(&form.email, Some(&e.to_string()));
            Ok((StatusCode::UNAUTHORIZED, Html(page)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        if let Some(user_id) = state.auth.logout(&token) {
            state
                .logger(loggers::APP)
                .info(format!("User {} logged out", user_id));
        }
    }
    ([(SET_COOKIE, clear_session_cookie())], Redirect::to("/")).into_response()
}

pub async fn dashboard(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Html<String>, AppError> {
    let songs = state.songs.list_for_user(user.id).await?;
    Ok(Html(views::dashboard_page(&user, &songs)))
}
