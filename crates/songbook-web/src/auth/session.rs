//! Cookie sessions
//!
//! Sessions are opaque random tokens mapped to user IDs in memory. They do
//! not survive a restart.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use dashmap::DashMap;
use songbook_core::branding::SESSION_COOKIE;
use songbook_storage::generate_token;

/// In-memory session table: token → user ID
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, i64>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session and return its token
    pub fn create(&self, user_id: i64) -> anyhow::Result<String> {
        let token = generate_token()?;
        self.sessions.insert(token.clone(), user_id);
        Ok(token)
    }

    pub fn user_id(&self, token: &str) -> Option<i64> {
        self.sessions.get(token).map(|entry| *entry.value())
    }

    /// End a session; returns the user it belonged to
    pub fn remove(&self, token: &str) -> Option<i64> {
        self.sessions.remove(token).map(|(_, user_id)| user_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// `Set-Cookie` value starting a session
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax",
        SESSION_COOKIE, token
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value expiring the session cookie
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

/// Session token from the request's `Cookie` headers
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.trim().to_string())
        .filter(|token| !token.is_empty())
}
