//! GraphQL schema definition
//!
//! Query and mutation roots are merged from the per-domain objects in
//! `queries/` and `mutations/`.

use std::sync::Arc;

use async_graphql::dataloader::DataLoader;
use async_graphql::extensions::Tracing;
use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::Database;
use crate::services::AuthService;

use super::loaders::BookCountLoader;
use super::mutations::{AuthorMutations, BookMutations, UserMutations};
use super::queries::{AuthorQueries, BookQueries, UserQueries};

/// The GraphQL schema type
pub type CatalogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
#[graphql(name = "Query")]
pub struct QueryRoot(BookQueries, AuthorQueries, UserQueries);

#[derive(MergedObject, Default)]
#[graphql(name = "Mutation")]
pub struct MutationRoot(BookMutations, AuthorMutations, UserMutations);

/// Build the GraphQL schema with the store and auth service injected
pub fn build_schema(db: Database, auth: Arc<AuthService>) -> CatalogSchema {
    let book_counts = DataLoader::new(BookCountLoader::new(db.clone()), tokio::spawn);

    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(db)
        .data(auth)
        .data(book_counts)
        .extension(Tracing)
        .finish()
}
