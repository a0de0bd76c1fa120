//! Repository implementations using SQLite.

mod location_repository;
mod song_repository;
mod user_repository;

pub use location_repository::SqliteLocationRepository;
pub use song_repository::SqliteSongRepository;
pub use user_repository::SqliteUserRepository;
