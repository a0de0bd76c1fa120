//! Songbook Storage Layer
//!
//! SQLite persistence for users, songs and map locations, plus password
//! hashing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    Web handlers                      │
//! ├──────────────────────────────────────────────────────┤
//! │               Repository Traits                      │
//! │   (UserRepository, SongRepository, LocationRepo)     │
//! ├──────────────────────────────────────────────────────┤
//! │            SQLite Implementations                    │
//! │   (SqliteUserRepository, SqliteSongRepository, ...)  │
//! ├──────────────────────────────────────────────────────┤
//! │                   Database                           │
//! │           (SQLite, numbered migrations)              │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use songbook_storage::{Database, SqliteUserRepository, SqliteSongRepository};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! let db = Database::open(&path)?;
//! let db = Arc::new(Mutex::new(db));
//!
//! let users = SqliteUserRepository::new(db.clone());
//! let songs = SqliteSongRepository::new(db.clone());
//! ```

pub mod crypto;
mod database;
mod repositories;

pub use crypto::{generate_token, PasswordHasher, DEFAULT_ITERATIONS, TOKEN_SIZE};
pub use database::Database;
pub use repositories::*;

/// Shared handle used by every repository.
pub type SharedDatabase = std::sync::Arc<tokio::sync::Mutex<Database>>;

/// Wrap an open database for sharing between repositories.
pub fn shared(db: Database) -> SharedDatabase {
    std::sync::Arc::new(tokio::sync::Mutex::new(db))
}
