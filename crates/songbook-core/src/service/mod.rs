//! Domain services

pub mod csv_import;
pub mod log_bootstrap;
pub mod log_sinks;
pub mod logger_taxonomy;

pub use csv_import::{parse_locations, parse_songs, CsvImportError};
pub use log_bootstrap::{ensure_log_directory, LoggingBootstrap};
pub use log_sinks::{
    ConsoleSink, LogFormat, LogSink, LoggingError, MemorySink, RotatingFileSink, SinkRegistry,
    SinkSpec, SinkTarget, STANDARD_FORMAT,
};
pub use logger_taxonomy::{loggers, Logger, LoggerSpec, LoggerTaxonomy, LoggingConfig};
