//! # Songbook Core Library
//!
//! Domain types, configuration and the logging pipeline shared by every
//! Songbook crate.
//!
//! ## Modules
//!
//! - `branding` - Product naming and well-known file names
//! - `config` - Run-mode profiles resolved from the environment
//! - `domain` - Core entities (User, Song, Location, LogRecord)
//! - `repository` - Data access traits
//! - `service` - Log sinks, logger taxonomy, bootstrap and CSV import

pub mod branding;
pub mod config;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError, DatabaseLocation, RunMode};
pub use domain::*;
pub use repository::*;
pub use service::*;
