//! Startup sequence: logging, database, server

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use songbook_core::{loggers, AppConfig, LoggerTaxonomy, LoggingBootstrap, LoggingConfig};
use songbook_storage::{shared, Database, SharedDatabase};
use tracing::debug;

use super::{DependenciesBuilder, SongbookServer};
use crate::logging::{init_tracing, DEFAULT_FILTER};

/// Configure the logger taxonomy (once) and route `tracing` events into it.
///
/// Calling this again returns the taxonomy installed by the first call.
pub fn install_logging(
    config: &AppConfig,
    bootstrap: &LoggingBootstrap,
) -> Result<Arc<LoggerTaxonomy>> {
    let (taxonomy, installed_now) = bootstrap
        .install_tracked(&LoggingConfig::from_app_config(config))
        .context("Failed to configure logging")?;

    if installed_now {
        if let Err(e) = init_tracing(taxonomy.clone(), DEFAULT_FILTER) {
            debug!("Tracing subscriber already installed: {}", e);
        }
        taxonomy.logger(loggers::APP).info(format!(
            "Logging configured in {} mode, writing to {}",
            config.mode,
            config.log_dir.display()
        ));
    }

    Ok(taxonomy)
}

/// Open the configured database, applying pending migrations
pub fn open_database(config: &AppConfig, taxonomy: &LoggerTaxonomy) -> Result<SharedDatabase> {
    let db = Database::open_location(&config.database)
        .with_context(|| format!("Failed to open database {:?}", config.database))?;

    taxonomy.logger(loggers::DATABASE).info(format!(
        "Database ready at {:?} (schema version {})",
        config.database,
        db.schema_version()
    ));

    Ok(shared(db))
}

/// Wire the server over an installed taxonomy and an open database
pub fn build_server(
    config: AppConfig,
    taxonomy: Arc<LoggerTaxonomy>,
    database: SharedDatabase,
) -> Result<SongbookServer> {
    let dependencies = DependenciesBuilder::new()
        .with_config(config)
        .with_taxonomy(taxonomy)
        .with_database(database)
        .build()
        .map_err(|e| anyhow!(e))?;

    Ok(SongbookServer::new(dependencies))
}
