pub mod authors;
pub mod books;
pub mod user;

pub use authors::AuthorQueries;
pub use books::BookQueries;
pub use user::UserQueries;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ErrorExtensions, Object, Result};

    pub(crate) use crate::db::{BookFilter, Database};
    pub(crate) use crate::graphql::auth::AuthExt;
    pub(crate) use crate::graphql::errors::CatalogError;
    pub(crate) use crate::graphql::types::*;
}
