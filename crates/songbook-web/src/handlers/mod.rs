//! HTTP handlers

pub mod api;
pub mod auth;
pub mod health;
pub mod map;
pub mod pages;
pub mod songs;
pub mod upload;
