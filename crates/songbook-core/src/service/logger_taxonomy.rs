//! Logger taxonomy
//!
//! Maps logical logger names (`request`, `errors`, `database.migrations`, ...)
//! to sinks. Names are dotted; a record first has to clear the level of the
//! logger it was emitted under (or its nearest configured ancestor), then
//! each sink's own level. Propagation walks up the dotted chain to `root`
//! until a logger with `propagate = false` is reached.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::{LogLevel, LogRecord};

use super::log_sinks::{LogSink, LoggingError, SinkRegistry, SinkSpec};

/// Logical logger names used across the application
pub mod loggers {
    pub const ROOT: &str = "root";
    pub const APP: &str = "app";
    pub const REQUEST: &str = "request";
    pub const ERRORS: &str = "errors";
    pub const DATABASE: &str = "database";
    pub const FRAMEWORK: &str = "framework";
    pub const CSV_UPLOAD: &str = "csv_upload";
}

/// Routing rule for one logical logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerSpec {
    pub name: String,
    /// Sink identifiers, in delivery order
    pub sinks: Vec<String>,
    pub level: LogLevel,
    /// Also hand accepted records to the parent chain
    pub propagate: bool,
}

impl LoggerSpec {
    pub fn new(name: impl Into<String>, level: LogLevel) -> Self {
        Self {
            name: name.into(),
            sinks: Vec::new(),
            level,
            propagate: true,
        }
    }

    pub fn with_sink(mut self, id: impl Into<String>) -> Self {
        self.sinks.push(id.into());
        self
    }

    /// Stop records at this logger
    pub fn isolated(mut self) -> Self {
        self.propagate = false;
        self
    }
}

/// Complete logging configuration: directory, sinks and loggers
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub sinks: Vec<SinkSpec>,
    pub root: LoggerSpec,
    pub loggers: Vec<LoggerSpec>,
}

impl LoggingConfig {
    /// Empty configuration: a root logger at DEBUG with no sinks
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            sinks: Vec::new(),
            root: LoggerSpec::new(loggers::ROOT, LogLevel::Debug),
            loggers: Vec::new(),
        }
    }

    /// The application's standard taxonomy. Every category gets its own file
    /// under `log_dir`; the root logger also writes to the console.
    pub fn standard(log_dir: impl Into<PathBuf>, max_bytes: u64, backup_count: usize) -> Self {
        let log_dir = log_dir.into();
        let file = |id: &str, name: &str| {
            SinkSpec::rotating_file(id, log_dir.join(name), max_bytes, backup_count)
        };

        let sinks = vec![
            SinkSpec::console("console"),
            file("file.handler", "handler.log"),
            file("file.app", "app.log"),
            file("file.request", "request.log"),
            file("file.errors", "errors.log"),
            file("file.database", "database.log"),
            file("file.framework", "framework.log"),
            file("file.csv_upload", "csv_upload.log"),
        ];

        let root = LoggerSpec::new(loggers::ROOT, LogLevel::Debug)
            .with_sink("console")
            .with_sink("file.handler");

        let isolated = |name: &str, sink: &str, level: LogLevel| {
            LoggerSpec::new(name, level).with_sink(sink).isolated()
        };

        let categories = vec![
            isolated(loggers::APP, "file.app", LogLevel::Debug),
            isolated(loggers::REQUEST, "file.request", LogLevel::Debug),
            isolated(loggers::ERRORS, "file.errors", LogLevel::Debug),
            isolated(loggers::DATABASE, "file.database", LogLevel::Info),
            isolated(loggers::FRAMEWORK, "file.framework", LogLevel::Debug),
            isolated(loggers::CSV_UPLOAD, "file.csv_upload", LogLevel::Debug),
        ];

        Self {
            log_dir,
            sinks,
            root,
            loggers: categories,
        }
    }

    /// Standard taxonomy sized from the application configuration
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::standard(
            &config.log_dir,
            config.log_max_bytes,
            config.log_backup_count,
        )
    }

    /// Drop every console sink (and references to it). Handy for tests.
    pub fn without_console(mut self) -> Self {
        let console: HashSet<String> = self
            .sinks
            .iter()
            .filter(|s| s.file_path().is_none())
            .map(|s| s.id.clone())
            .collect();

        self.sinks.retain(|s| !console.contains(&s.id));
        self.root.sinks.retain(|id| !console.contains(id));
        for logger in &mut self.loggers {
            logger.sinks.retain(|id| !console.contains(id));
        }
        self
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Path of a file sink by identifier
    pub fn sink_path(&self, id: &str) -> Option<&Path> {
        self.sinks
            .iter()
            .find(|s| s.id == id)
            .and_then(SinkSpec::file_path)
    }
}

struct LoggerNode {
    level: LogLevel,
    propagate: bool,
    sinks: Vec<Arc<dyn LogSink>>,
}

/// Installed taxonomy. Immutable after construction; share it behind an `Arc`.
pub struct LoggerTaxonomy {
    sinks: SinkRegistry,
    root: LoggerNode,
    loggers: HashMap<String, LoggerNode>,
    failures: AtomicU64,
}

impl LoggerTaxonomy {
    /// Open every sink and wire the loggers to them.
    ///
    /// The log directory must exist; see `ensure_log_directory`.
    pub fn configure(config: &LoggingConfig) -> Result<Self, LoggingError> {
        let sinks = SinkRegistry::build(&config.sinks)?;
        Self::with_registry(sinks, &config.root, &config.loggers)
    }

    /// Wire loggers to an already built registry
    pub fn with_registry(
        sinks: SinkRegistry,
        root: &LoggerSpec,
        specs: &[LoggerSpec],
    ) -> Result<Self, LoggingError> {
        let root_node = Self::node(&sinks, root)?;

        let mut nodes = HashMap::new();
        for spec in specs {
            if spec.name == loggers::ROOT || spec.name.is_empty() {
                return Err(LoggingError::DuplicateLogger(spec.name.clone()));
            }
            let node = Self::node(&sinks, spec)?;
            if nodes.insert(spec.name.clone(), node).is_some() {
                return Err(LoggingError::DuplicateLogger(spec.name.clone()));
            }
        }

        Ok(Self {
            sinks,
            root: root_node,
            loggers: nodes,
            failures: AtomicU64::new(0),
        })
    }

    fn node(registry: &SinkRegistry, spec: &LoggerSpec) -> Result<LoggerNode, LoggingError> {
        let mut seen = HashSet::new();
        let mut sinks = Vec::with_capacity(spec.sinks.len());

        for id in &spec.sinks {
            // Listing a sink twice attaches it once
            if !seen.insert(id.as_str()) {
                continue;
            }
            let sink = registry
                .get(id)
                .ok_or_else(|| LoggingError::UnknownSink {
                    logger: spec.name.clone(),
                    sink: id.clone(),
                })?;
            sinks.push(sink);
        }

        Ok(LoggerNode {
            level: spec.level,
            propagate: spec.propagate,
            sinks,
        })
    }

    /// Routing handle for a logical name. Unconfigured names are valid and
    /// behave like their nearest configured ancestor.
    pub fn logger<'a>(&'a self, name: &'a str) -> Logger<'a> {
        Logger {
            taxonomy: self,
            name,
        }
    }

    /// Whether `name` has its own logger entry (root always does)
    pub fn is_configured(&self, name: &str) -> bool {
        Self::is_root(name) || self.loggers.contains_key(name)
    }

    /// Level applied to records emitted under `name`
    pub fn effective_level(&self, name: &str) -> LogLevel {
        self.chain(name)
            .first()
            .map(|node| node.level)
            .unwrap_or(self.root.level)
    }

    /// Deliver a record. Returns how many sinks accepted it.
    ///
    /// Sink failures are counted and reported on stderr, never returned.
    pub fn dispatch(&self, record: &LogRecord) -> usize {
        if record.level < self.effective_level(&record.logger) {
            return 0;
        }

        let mut delivered = 0;
        let mut written: Vec<*const ()> = Vec::new();

        for node in self.chain(&record.logger) {
            for sink in &node.sinks {
                if record.level < sink.level() {
                    continue;
                }
                // A sink reachable through several loggers still writes once
                let key = Arc::as_ptr(sink) as *const ();
                if written.contains(&key) {
                    continue;
                }
                written.push(key);

                match sink.emit(record) {
                    Ok(()) => delivered += 1,
                    Err(err) => self.report_failure(sink.id(), &err),
                }
            }
            if !node.propagate {
                break;
            }
        }

        delivered
    }

    /// Number of sink writes that failed since installation
    pub fn failed_writes(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn sinks(&self) -> &SinkRegistry {
        &self.sinks
    }

    /// Flush every sink
    pub fn flush(&self) {
        self.sinks.flush_all();
    }

    fn report_failure(&self, sink: &str, err: &std::io::Error) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        eprintln!("songbook: log sink '{}' failed: {}", sink, err);
    }

    fn is_root(name: &str) -> bool {
        name.is_empty() || name == loggers::ROOT
    }

    /// Configured loggers from `name` up to root, nearest first
    fn chain(&self, name: &str) -> Vec<&LoggerNode> {
        let mut chain = Vec::new();
        if !Self::is_root(name) {
            let mut current = name;
            loop {
                if let Some(node) = self.loggers.get(current) {
                    chain.push(node);
                }
                match current.rfind('.') {
                    Some(idx) => current = &current[..idx],
                    None => break,
                }
            }
        }
        chain.push(&self.root);
        chain
    }
}

impl std::fmt::Debug for LoggerTaxonomy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.loggers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("LoggerTaxonomy")
            .field("sinks", &self.sinks)
            .field("loggers", &names)
            .finish()
    }
}

/// Handle for emitting records under one logical name
#[derive(Clone, Copy)]
pub struct Logger<'a> {
    taxonomy: &'a LoggerTaxonomy,
    name: &'a str,
}

impl<'a> Logger<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn is_enabled_for(&self, level: LogLevel) -> bool {
        level >= self.taxonomy.effective_level(self.name)
    }

    /// Emit a record; returns how many sinks received it
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> usize {
        if !self.is_enabled_for(level) {
            return 0;
        }
        self.taxonomy
            .dispatch(&LogRecord::new(level, self.name, message))
    }

    pub fn debug(&self, message: impl Into<String>) -> usize {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: impl Into<String>) -> usize {
        self.log(LogLevel::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> usize {
        self.log(LogLevel::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> usize {
        self.log(LogLevel::Error, message)
    }

    pub fn critical(&self, message: impl Into<String>) -> usize {
        self.log(LogLevel::Critical, message)
    }
}
