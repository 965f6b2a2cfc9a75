//! GraphQL API
//!
//! The single API surface of the catalog: queries and mutations over authors,
//! books and users, served at `/graphql`.

pub mod auth;
pub mod errors;
pub mod loaders;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use auth::{AuthExt, AuthGuard, CurrentUser, resolve_current_user};
pub use errors::CatalogError;
pub use schema::{CatalogSchema, MutationRoot, QueryRoot, build_schema};
