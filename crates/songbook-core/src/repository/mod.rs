//! Repository traits for data access
//!
//! These traits define the interface for data storage without specifying
//! the implementation (SQLite, in-memory, etc.)

use async_trait::async_trait;

use crate::domain::{Location, NewLocation, NewSong, NewUser, Song, User};

/// Result type for repository operations
pub type RepoResult<T> = anyhow::Result<T>;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user and return it with its assigned ID
    async fn create(&self, user: &NewUser) -> RepoResult<User>;

    /// Get a user by ID
    async fn get(&self, id: i64) -> RepoResult<Option<User>>;

    /// Get a user by (normalized) email
    async fn get_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Number of registered users
    async fn count(&self) -> RepoResult<i64>;
}

/// Song repository trait
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Store a batch of songs for a user, returning how many were inserted
    async fn insert_many(&self, user_id: i64, songs: &[NewSong]) -> RepoResult<usize>;

    /// One page of songs, newest first. Pages start at 1.
    async fn list_page(&self, page: u32, per_page: u32) -> RepoResult<Vec<Song>>;

    /// All songs uploaded by a user
    async fn list_for_user(&self, user_id: i64) -> RepoResult<Vec<Song>>;

    /// Total number of songs
    async fn count(&self) -> RepoResult<i64>;
}

/// Location repository trait
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Store a batch of locations for a user, returning how many were inserted
    async fn insert_many(&self, user_id: i64, locations: &[NewLocation]) -> RepoResult<usize>;

    /// All locations
    async fn list(&self) -> RepoResult<Vec<Location>>;
}
