//! Application services

pub mod auth;
pub mod logging;

pub use auth::{AuthConfig, AuthError, AuthService};
pub use logging::init_tracing;
