//! SQLite implementation of UserRepository.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use songbook_core::{normalize_email, NewUser, User, UserRepository};

use crate::SharedDatabase;

const USER_COLUMNS: &str = "id, email, password_hash, active, is_admin, registered_on";

/// SQLite-backed implementation of UserRepository.
pub struct SqliteUserRepository {
    db: SharedDatabase,
}

impl SqliteUserRepository {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    /// Parse a stored timestamp.
    /// Handles both RFC3339 and SQLite's `datetime('now')` format.
    fn parse_datetime(s: &str) -> DateTime<Utc> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return dt.with_timezone(&Utc);
        }
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return dt.and_utc();
        }
        tracing::warn!("[UserRepository] Unparseable timestamp '{}', using now", s);
        Utc::now()
    }

    fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            active: row.get::<_, i32>(3)? == 1,
            is_admin: row.get::<_, i32>(4)? == 1,
            registered_on: Self::parse_datetime(&row.get::<_, String>(5)?),
        })
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User> {
        let db = self.db.lock().await;
        let conn = db.connection();
        let registered_on = Utc::now();
        let email = normalize_email(&user.email);

        conn.execute(
            "INSERT INTO users (email, password_hash, active, is_admin, registered_on)
             VALUES (?1, ?2, 1, ?3, ?4)",
            params![
                email,
                user.password_hash,
                if user.is_admin { 1 } else { 0 },
                registered_on.to_rfc3339(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        tracing::debug!("[UserRepository::create] Created user {} ({})", id, email);

        Ok(User {
            id,
            email,
            password_hash: user.password_hash.clone(),
            active: true,
            is_admin: user.is_admin,
            registered_on,
        })
    }

    async fn get(&self, id: i64) -> Result<Option<User>> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                Self::row_to_user,
            )
            .optional()?;

        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                params![normalize_email(email)],
                Self::row_to_user,
            )
            .optional()?;

        Ok(user)
    }

    async fn count(&self) -> Result<i64> {
        let db = self.db.lock().await;
        let count = db
            .connection()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}
