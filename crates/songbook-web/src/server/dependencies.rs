//! Dependency container
//!
//! Repositories default to the SQLite implementations over the shared
//! database; tests can swap any of them out.

use std::sync::Arc;

use songbook_core::{AppConfig, LocationRepository, LoggerTaxonomy, SongRepository, UserRepository};
use songbook_storage::{
    PasswordHasher, SharedDatabase, SqliteLocationRepository, SqliteSongRepository,
    SqliteUserRepository,
};

use super::AppState;
use crate::auth::AuthService;

/// Everything the web server needs from the outside
#[derive(Clone)]
pub struct SongbookDependencies {
    pub config: Arc<AppConfig>,
    pub taxonomy: Arc<LoggerTaxonomy>,
    pub database: SharedDatabase,
    pub user_repo: Arc<dyn UserRepository>,
    pub song_repo: Arc<dyn SongRepository>,
    pub location_repo: Arc<dyn LocationRepository>,
    pub password_hasher: Arc<PasswordHasher>,
}

impl SongbookDependencies {
    /// Assemble the handler state
    pub fn into_state(self) -> AppState {
        let auth = Arc::new(AuthService::new(
            self.user_repo.clone(),
            self.password_hasher,
        ));

        AppState {
            config: self.config,
            taxonomy: self.taxonomy,
            users: self.user_repo,
            songs: self.song_repo,
            locations: self.location_repo,
            auth,
        }
    }
}

/// Builder for SongbookDependencies
pub struct DependenciesBuilder {
    config: Option<AppConfig>,
    taxonomy: Option<Arc<LoggerTaxonomy>>,
    database: Option<SharedDatabase>,
    user_repo: Option<Arc<dyn UserRepository>>,
    song_repo: Option<Arc<dyn SongRepository>>,
    location_repo: Option<Arc<dyn LocationRepository>>,
    password_hasher: Option<Arc<PasswordHasher>>,
}

impl DependenciesBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            taxonomy: None,
            database: None,
            user_repo: None,
            song_repo: None,
            location_repo: None,
            password_hasher: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_taxonomy(mut self, taxonomy: Arc<LoggerTaxonomy>) -> Self {
        self.taxonomy = Some(taxonomy);
        self
    }

    pub fn with_database(mut self, db: SharedDatabase) -> Self {
        self.database = Some(db);
        self
    }

    pub fn with_user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn with_song_repo(mut self, repo: Arc<dyn SongRepository>) -> Self {
        self.song_repo = Some(repo);
        self
    }

    pub fn with_location_repo(mut self, repo: Arc<dyn LocationRepository>) -> Self {
        self.location_repo = Some(repo);
        self
    }

    pub fn with_password_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.password_hasher = Some(Arc::new(hasher));
        self
    }

    pub fn build(self) -> Result<SongbookDependencies, String> {
        let database = self.database.ok_or("database is required")?;
        let taxonomy = self.taxonomy.ok_or("taxonomy is required")?;

        // Create repositories from database if not provided
        let user_repo = self
            .user_repo
            .unwrap_or_else(|| Arc::new(SqliteUserRepository::new(database.clone())));
        let song_repo = self
            .song_repo
            .unwrap_or_else(|| Arc::new(SqliteSongRepository::new(database.clone())));
        let location_repo = self
            .location_repo
            .unwrap_or_else(|| Arc::new(SqliteLocationRepository::new(database.clone())));

        Ok(SongbookDependencies {
            config: Arc::new(self.config.ok_or("config is required")?),
            taxonomy,
            database,
            user_repo,
            song_repo,
            location_repo,
            password_hasher: self
                .password_hasher
                .unwrap_or_else(|| Arc::new(PasswordHasher::new())),
        })
    }
}

impl Default for DependenciesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
