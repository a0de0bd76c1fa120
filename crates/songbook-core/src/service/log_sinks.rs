//! Log sinks - console and size-rotated file destinations
//!
//! Every sink owns its own lock; concurrent writers never interleave
//! partial lines and rotation happens under the same lock as the write.
//!
//! Sinks must not emit `tracing` events themselves: the tracing bridge feeds
//! events back into sinks, so logging from here would re-enter the lock.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

use crate::domain::{LogLevel, LogRecord};

/// `<timestamp> [<LEVEL>] <logger-name>: <message>`
pub const STANDARD_FORMAT: &str = "{asctime} [{levelname}] {name}: {message}";

/// Timestamp layout used for `{asctime}`, e.g. `2024-03-01 14:02:11,042`.
const ASCTIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Errors raised while building the logging pipeline. All are fatal at startup.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {path:?}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open log file {path:?}: {source}")]
    OpenSink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("sink '{0}' is defined more than once")]
    DuplicateSink(String),

    #[error("sinks '{first}' and '{second}' both write to {path:?}")]
    SharedPath {
        first: String,
        second: String,
        path: PathBuf,
    },

    #[error("logger '{logger}' references unknown sink '{sink}'")]
    UnknownSink { logger: String, sink: String },

    #[error("logger '{0}' is defined more than once")]
    DuplicateLogger(String),
}

/// Line format with `{asctime}`, `{levelname}`, `{name}` and `{message}`
/// placeholders. Unknown placeholders are copied through literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFormat {
    pattern: String,
}

impl LogFormat {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn standard() -> Self {
        Self::new(STANDARD_FORMAT)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Render a record (without trailing newline).
    ///
    /// Single pass over the pattern, so placeholder-like text inside the
    /// message is never expanded.
    pub fn render(&self, record: &LogRecord) -> String {
        let mut out = String::with_capacity(self.pattern.len() + record.message.len() + 32);
        let mut rest = self.pattern.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    match &after[..close] {
                        "asctime" => {
                            out.push_str(&record.timestamp.format(ASCTIME_FORMAT).to_string())
                        }
                        "levelname" => out.push_str(record.level.as_str()),
                        "name" => out.push_str(&record.logger),
                        "message" => out.push_str(&record.message),
                        other => {
                            out.push('{');
                            out.push_str(other);
                            out.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl Default for LogFormat {
    fn default() -> Self {
        Self::standard()
    }
}

/// Physical destination of a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    Stdout,
    Stderr,
    RotatingFile {
        path: PathBuf,
        /// Byte cap per file; 0 disables rotation
        max_bytes: u64,
        /// Rotated files kept next to the active one
        backup_count: usize,
    },
}

/// Declarative description of one sink
#[derive(Debug, Clone)]
pub struct SinkSpec {
    pub id: String,
    pub level: LogLevel,
    pub format: LogFormat,
    pub target: SinkTarget,
}

impl SinkSpec {
    /// Console sink on stdout
    pub fn console(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level: LogLevel::Debug,
            format: LogFormat::standard(),
            target: SinkTarget::Stdout,
        }
    }

    /// Size-rotated file sink
    pub fn rotating_file(
        id: impl Into<String>,
        path: impl Into<PathBuf>,
        max_bytes: u64,
        backup_count: usize,
    ) -> Self {
        Self {
            id: id.into(),
            level: LogLevel::Debug,
            format: LogFormat::standard(),
            target: SinkTarget::RotatingFile {
                path: path.into(),
                max_bytes,
                backup_count,
            },
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// File path for file-backed sinks
    pub fn file_path(&self) -> Option<&Path> {
        match &self.target {
            SinkTarget::RotatingFile { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// An output destination for log records
pub trait LogSink: Send + Sync {
    /// Registry identifier
    fn id(&self) -> &str;

    /// Minimum severity this sink accepts
    fn level(&self) -> LogLevel;

    /// Write one record. Errors are reported to the caller, never retried.
    fn emit(&self, record: &LogRecord) -> io::Result<()>;

    /// Flush buffered output
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Console sink backed by a non-blocking, lossy writer.
///
/// A slow terminal drops lines instead of stalling request handling.
pub struct ConsoleSink {
    id: String,
    level: LogLevel,
    format: LogFormat,
    writer: Mutex<NonBlocking>,
    _guard: WorkerGuard,
}

impl ConsoleSink {
    pub fn stdout(id: impl Into<String>, level: LogLevel, format: LogFormat) -> Self {
        let (writer, guard) = tracing_appender::non_blocking(io::stdout());
        Self::from_writer(id, level, format, writer, guard)
    }

    pub fn stderr(id: impl Into<String>, level: LogLevel, format: LogFormat) -> Self {
        let (writer, guard) = tracing_appender::non_blocking(io::stderr());
        Self::from_writer(id, level, format, writer, guard)
    }

    fn from_writer(
        id: impl Into<String>,
        level: LogLevel,
        format: LogFormat,
        writer: NonBlocking,
        guard: WorkerGuard,
    ) -> Self {
        Self {
            id: id.into(),
            level,
            format,
            writer: Mutex::new(writer),
            _guard: guard,
        }
    }
}

impl LogSink for ConsoleSink {
    fn id(&self) -> &str {
        &self.id
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn emit(&self, record: &LogRecord) -> io::Result<()> {
        let mut line = self.format.render(record);
        line.push('\n');
        self.writer.lock().write_all(line.as_bytes())
    }

    fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }
}

/// Open handle plus the number of bytes already in the active file.
///
/// `file` is `None` between a rotation and the next write.
struct FileState {
    file: Option<File>,
    size: u64,
}

/// File sink that rolls over once a write would exceed `max_bytes`.
///
/// Backups are numbered: `<file>.1` is the newest, `<file>.<backup_count>`
/// the oldest. Anything older is deleted on rotation.
pub struct RotatingFileSink {
    id: String,
    level: LogLevel,
    format: LogFormat,
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    state: Mutex<FileState>,
}

impl RotatingFileSink {
    /// Open (or create) the active file in append mode.
    ///
    /// The parent directory must already exist.
    pub fn open(
        id: impl Into<String>,
        level: LogLevel,
        format: LogFormat,
        path: impl Into<PathBuf>,
        max_bytes: u64,
        backup_count: usize,
    ) -> io::Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            id: id.into(),
            level,
            format,
            path,
            max_bytes,
            backup_count,
            state: Mutex::new(FileState {
                file: Some(file),
                size,
            }),
        })
    }

    /// Path of the active file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the n-th backup (1 = newest)
    pub fn backup_path(&self, index: usize) -> PathBuf {
        backup_path(&self.path, index)
    }

    /// Bytes in the active file
    pub fn current_size(&self) -> u64 {
        self.state.lock().size
    }

    fn should_rotate(&self, current: u64, incoming: u64) -> bool {
        // An empty file always takes the line, even if it alone exceeds the cap
        self.max_bytes > 0 && current > 0 && current + incoming > self.max_bytes
    }

    fn rotate(&self, state: &mut FileState) -> io::Result<()> {
        if self.backup_count == 0 {
            state.file = None;
            state.size = 0;
            File::create(&self.path)?;
            return Ok(());
        }

        // Shift <file>.N-1 -> <file>.N, ..., <file>.1 -> <file>.2; the oldest falls off
        for index in (1..self.backup_count).rev() {
            let src = self.backup_path(index);
            if src.exists() {
                let dst = self.backup_path(index + 1);
                if dst.exists() {
                    fs::remove_file(&dst)?;
                }
                fs::rename(&src, &dst)?;
            }
        }

        let newest = self.backup_path(1);
        if newest.exists() {
            fs::remove_file(&newest)?;
        }
        fs::rename(&self.path, &newest)?;

        state.file = None;
        state.size = 0;
        Ok(())
    }
}

impl LogSink for RotatingFileSink {
    fn id(&self) -> &str {
        &self.id
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn emit(&self, record: &LogRecord) -> io::Result<()> {
        let mut line = self.format.render(record);
        line.push('\n');
        let len = line.len() as u64;

        let mut state = self.state.lock();
        if self.should_rotate(state.size, len) {
            if let Err(err) = self.rotate(&mut state) {
                // Start over in a fresh active file rather than shifting the
                // backups again on every following write
                state.file = None;
                state.size = 0;
                return Err(err);
            }
        }

        let file = match state.file.take() {
            Some(file) => file,
            None => open_append(&self.path)?,
        };
        state.file.insert(file).write_all(line.as_bytes())?;
        state.size += len;
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        match self.state.lock().file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}

/// In-memory sink that keeps rendered lines. Used for diagnostics and tests.
pub struct MemorySink {
    id: String,
    level: LogLevel,
    format: LogFormat,
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new(id: impl Into<String>, level: LogLevel) -> Self {
        Self {
            id: id.into(),
            level,
            format: LogFormat::standard(),
            lines: Mutex::new(Vec::new()),
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Snapshot of every line written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl LogSink for MemorySink {
    fn id(&self) -> &str {
        &self.id
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn emit(&self, record: &LogRecord) -> io::Result<()> {
        self.lines.lock().push(self.format.render(record));
        Ok(())
    }
}

/// Fixed set of named sinks, built once at startup
#[derive(Default)]
pub struct SinkRegistry {
    sinks: HashMap<String, Arc<dyn LogSink>>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the specs and open every sink.
    ///
    /// Rotating file sinks require their directory to exist already.
    pub fn build(specs: &[SinkSpec]) -> Result<Self, LoggingError> {
        let mut seen_ids = HashSet::new();
        let mut seen_paths: HashMap<&Path, &str> = HashMap::new();

        for spec in specs {
            if !seen_ids.insert(spec.id.as_str()) {
                return Err(LoggingError::DuplicateSink(spec.id.clone()));
            }
            if let Some(path) = spec.file_path() {
                if let Some(first) = seen_paths.insert(path, spec.id.as_str()) {
                    return Err(LoggingError::SharedPath {
                        first: first.to_string(),
                        second: spec.id.clone(),
                        path: path.to_path_buf(),
                    });
                }
            }
        }

        let mut registry = Self::new();
        for spec in specs {
            let sink: Arc<dyn LogSink> = match &spec.target {
                SinkTarget::Stdout => Arc::new(ConsoleSink::stdout(
                    spec.id.clone(),
                    spec.level,
                    spec.format.clone(),
                )),
                SinkTarget::Stderr => Arc::new(ConsoleSink::stderr(
                    spec.id.clone(),
                    spec.level,
                    spec.format.clone(),
                )),
                SinkTarget::RotatingFile {
                    path,
                    max_bytes,
                    backup_count,
                } => Arc::new(
                    RotatingFileSink::open(
                        spec.id.clone(),
                        spec.level,
                        spec.format.clone(),
                        path.clone(),
                        *max_bytes,
                        *backup_count,
                    )
                    .map_err(|source| LoggingError::OpenSink {
                        path: path.clone(),
                        source,
                    })?,
                ),
            };
            registry.sinks.insert(spec.id.clone(), sink);
        }

        Ok(registry)
    }

    /// Add an already constructed sink
    pub fn register(&mut self, sink: Arc<dyn LogSink>) -> Result<(), LoggingError> {
        let id = sink.id().to_string();
        if self.sinks.contains_key(&id) {
            return Err(LoggingError::DuplicateSink(id));
        }
        self.sinks.insert(id, sink);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn LogSink>> {
        self.sinks.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sinks.contains_key(id)
    }

    /// Sorted sink identifiers
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sinks.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Flush every sink, ignoring individual failures
    pub fn flush_all(&self) {
        for sink in self.sinks.values() {
            let _ = sink.flush();
        }
    }
}

impl std::fmt::Debug for SinkRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkRegistry")
            .field("sinks", &self.ids())
            .finish()
    }
}
