//! Database integration tests

mod migrations;
mod repositories;
