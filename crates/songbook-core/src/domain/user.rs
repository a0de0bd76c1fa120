//! User entity - a registered account

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    // local@domain.tld, no whitespace; deliberately loose
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Shortest password accepted at registration
pub const MIN_PASSWORD_LEN: usize = 8;

/// A registered user.
///
/// The password hash never leaves the storage layer in serialized output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Database-assigned identifier
    pub id: i64,

    /// Login email, stored lowercased
    pub email: String,

    /// Encoded password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Disabled accounts cannot log in
    pub active: bool,

    /// Administrators
    pub is_admin: bool,

    /// Registration timestamp
    pub registered_on: DateTime<Utc>,
}

/// Data needed to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

impl NewUser {
    /// Create a regular (non-admin) user. The email is normalized.
    pub fn new(email: impl AsRef<str>, password_hash: impl Into<String>) -> Self {
        Self {
            email: normalize_email(email.as_ref()),
            password_hash: password_hash.into(),
            is_admin: false,
        }
    }

    /// Mark as administrator
    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

/// Emails compare case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check the basic `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}
