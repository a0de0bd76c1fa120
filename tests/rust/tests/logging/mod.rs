//! Logging pipeline integration tests

mod bootstrap;
mod bridge;
mod taxonomy;
