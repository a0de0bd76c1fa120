//! One-shot installation of the logging pipeline

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::log_sinks::LoggingError;
use super::logger_taxonomy::{LoggerTaxonomy, LoggingConfig};

/// Create the log directory (and parents) if it does not exist yet.
pub fn ensure_log_directory(path: &Path) -> Result<(), LoggingError> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|source| LoggingError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })
}

/// Single-flight guard around taxonomy installation.
///
/// The first successful `install` wins; later calls (including concurrent
/// ones) get the same taxonomy back without touching the filesystem. A failed
/// attempt leaves the guard empty so startup can report it and retry.
#[derive(Debug, Default)]
pub struct LoggingBootstrap {
    installed: OnceCell<Arc<LoggerTaxonomy>>,
    runs: AtomicUsize,
}

impl LoggingBootstrap {
    pub const fn new() -> Self {
        Self {
            installed: OnceCell::new(),
            runs: AtomicUsize::new(0),
        }
    }

    /// Ensure the log directory, then configure sinks and loggers.
    pub fn install(&self, config: &LoggingConfig) -> Result<Arc<LoggerTaxonomy>, LoggingError> {
        self.install_tracked(config).map(|(taxonomy, _)| taxonomy)
    }

    /// Like [`install`](Self::install), also reporting whether this call
    /// performed the installation. Exactly one caller ever sees `true`.
    pub fn install_tracked(
        &self,
        config: &LoggingConfig,
    ) -> Result<(Arc<LoggerTaxonomy>, bool), LoggingError> {
        let mut performed = false;
        let taxonomy = self
            .installed
            .get_or_try_init(|| {
                self.runs.fetch_add(1, Ordering::SeqCst);
                ensure_log_directory(config.log_dir())?;
                let taxonomy = LoggerTaxonomy::configure(config).map(Arc::new)?;
                performed = true;
                Ok::<_, LoggingError>(taxonomy)
            })?
            .clone();
        Ok((taxonomy, performed))
    }

    /// The installed taxonomy, if any
    pub fn get(&self) -> Option<Arc<LoggerTaxonomy>> {
        self.installed.get().cloned()
    }

    pub fn is_installed(&self) -> bool {
        self.installed.get().is_some()
    }

    /// How many times installation actually ran
    pub fn install_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}
