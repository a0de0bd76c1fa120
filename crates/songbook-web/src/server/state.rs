//! Shared application state handed to every handler

use std::sync::Arc;

use songbook_core::{AppConfig, LocationRepository, Logger, LoggerTaxonomy, SongRepository, UserRepository};

use crate::auth::AuthService;

/// Application state
///
/// Cheap to clone; everything behind it is shared.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub taxonomy: Arc<LoggerTaxonomy>,
    pub users: Arc<dyn UserRepository>,
    pub songs: Arc<dyn SongRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Handle on one of the logical loggers
    pub fn logger<'a>(&'a self, name: &'a str) -> Logger<'a> {
        self.taxonomy.logger(name)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("mode", &self.config.mode)
            .field("taxonomy", &self.taxonomy)
            .finish_non_exhaustive()
    }
}
