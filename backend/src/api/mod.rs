//! REST route definitions
//!
//! The primary API is GraphQL at /graphql. Only health probes live here.

pub mod health;
