//! # Songbook Web
//!
//! The HTTP application: routes, sessions, HTML views and the request
//! logging pipeline.
//!
//! ## Modules
//!
//! - `auth` - Registration, login and cookie sessions
//! - `error` - Handler error type
//! - `handlers` - Route handlers
//! - `logging` - Request observer, error reporter and the tracing bridge
//! - `server` - Router assembly, dependency wiring and startup
//! - `views` - Server-rendered pages

pub mod auth;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod views;

pub use error::AppError;
pub use server::{
    build_router, build_server, install_logging, open_database, routes, with_layers, AppState,
    DependenciesBuilder, SongbookDependencies, SongbookServer,
};
