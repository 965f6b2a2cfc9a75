//! Library catalog backend
//!
//! Authors, books and users behind a GraphQL API, stored in SQLite, with
//! bearer-token authentication.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod graphql;
pub mod services;

pub use app::{AppState, build_app};
