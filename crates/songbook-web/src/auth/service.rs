//! Registration and login

use std::sync::Arc;

use axum::http::StatusCode;
use songbook_core::{is_valid_email, normalize_email, NewUser, User, UserRepository, MIN_PASSWORD_LEN};
use songbook_storage::PasswordHasher;
use thiserror::Error;

use super::session::SessionStore;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Passwords must match")]
    PasswordMismatch,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("This account is disabled")]
    Inactive,

    #[error("authentication backend failure: {0:#}")]
    Backend(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidEmail | Self::PasswordTooShort(_) | Self::PasswordMismatch => {
                StatusCode::BAD_REQUEST
            }
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::Inactive => StatusCode::UNAUTHORIZED,
            Self::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Problems the user can fix by resubmitting the form
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

/// Account operations over the user repository and the session store
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<PasswordHasher>,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<PasswordHasher>) -> Self {
        Self {
            users,
            hasher,
            sessions: SessionStore::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Validate the form and create a regular user
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<User, AuthError> {
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        if password != confirm {
            return Err(AuthError::PasswordMismatch);
        }

        let email = normalize_email(email);
        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let hash = self.hash(password.to_string()).await?;
        let user = self.users.create(&NewUser::new(&email, hash)).await?;
        Ok(user)
    }

    /// Check credentials and open a session. Returns the user and session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self
            .verify(password.to_string(), user.password_hash.clone())
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.active {
            return Err(AuthError::Inactive);
        }

        let token = self.sessions.create(user.id)?;
        Ok((user, token))
    }

    /// End a session. Returns the user ID it belonged to.
    pub fn logout(&self, token: &str) -> Option<i64> {
        self.sessions.remove(token)
    }

    /// Active user behind a session token.
    ///
    /// Sessions pointing at missing or disabled users are dropped. Storage
    /// errors are returned so the caller can log them.
    pub async fn user_for_token(&self, token: &str) -> anyhow::Result<Option<User>> {
        let Some(user_id) = self.sessions.user_id(token) else {
            return Ok(None);
        };

        match self.users.get(user_id).await? {
            Some(user) if user.active => Ok(Some(user)),
            _ => {
                self.sessions.remove(token);
                Ok(None)
            }
        }
    }

    // PBKDF2 is deliberately slow; keep it off the async workers
    async fn hash(&self, password: String) -> anyhow::Result<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password)).await?
    }

    async fn verify(&self, password: String, encoded: String) -> anyhow::Result<bool> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &encoded)).await?
    }
}
