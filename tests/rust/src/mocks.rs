//! Repositories and log sinks that fail on every call, for error-path tests.

use std::io;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use songbook_core::{
    loggers, LogLevel, LogRecord, LogSink, LoggerSpec, LoggerTaxonomy, NewSong, NewUser,
    RepoResult, SinkRegistry, Song, SongRepository, User, UserRepository,
};

/// Error message every failing repository returns
pub const STORAGE_FAILURE: &str = "disk I/O error";

/// Song repository whose storage is gone
#[derive(Debug, Default)]
pub struct FailingSongRepository;

#[async_trait]
impl SongRepository for FailingSongRepository {
    async fn insert_many(&self, _user_id: i64, _songs: &[NewSong]) -> RepoResult<usize> {
        Err(anyhow!(STORAGE_FAILURE))
    }

    async fn list_page(&self, _page: u32, _per_page: u32) -> RepoResult<Vec<Song>> {
        Err(anyhow!(STORAGE_FAILURE))
    }

    async fn list_for_user(&self, _user_id: i64) -> RepoResult<Vec<Song>> {
        Err(anyhow!(STORAGE_FAILURE))
    }

    async fn count(&self) -> RepoResult<i64> {
        Err(anyhow!(STORAGE_FAILURE))
    }
}

/// User repository whose storage is gone
#[derive(Debug, Default)]
pub struct FailingUserRepository;

#[async_trait]
impl UserRepository for FailingUserRepository {
    async fn create(&self, _user: &NewUser) -> RepoResult<User> {
        Err(anyhow!(STORAGE_FAILURE))
    }

    async fn get(&self, _id: i64) -> RepoResult<Option<User>> {
        Err(anyhow!(STORAGE_FAILURE))
    }

    async fn get_by_email(&self, _email: &str) -> RepoResult<Option<User>> {
        Err(anyhow!(STORAGE_FAILURE))
    }

    async fn count(&self) -> RepoResult<i64> {
        Err(anyhow!(STORAGE_FAILURE))
    }
}

/// Log sink whose disk is full
#[derive(Debug, Default)]
pub struct FailingSink;

impl FailingSink {
    pub const ID: &'static str = "broken";
}

impl LogSink for FailingSink {
    fn id(&self) -> &str {
        Self::ID
    }

    fn level(&self) -> LogLevel {
        LogLevel::Debug
    }

    fn emit(&self, _record: &LogRecord) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "No space left on device"))
    }
}

/// Standard logger names, every one of them writing to a [`FailingSink`]
pub fn failing_taxonomy() -> Arc<LoggerTaxonomy> {
    let mut registry = SinkRegistry::new();
    registry
        .register(Arc::new(FailingSink))
        .expect("Failed to register sink");

    let specs: Vec<_> = [
        loggers::APP,
        loggers::REQUEST,
        loggers::ERRORS,
        loggers::DATABASE,
        loggers::FRAMEWORK,
        loggers::CSV_UPLOAD,
    ]
    .into_iter()
    .map(|name| {
        LoggerSpec::new(name, LogLevel::Debug)
            .with_sink(FailingSink::ID)
            .isolated()
    })
    .collect();

    let taxonomy = LoggerTaxonomy::with_registry(
        registry,
        &LoggerSpec::new(loggers::ROOT, LogLevel::Debug).with_sink(FailingSink::ID),
        &specs,
    )
    .expect("Failed to wire loggers");
    Arc::new(taxonomy)
}
