//! GraphQL DataLoaders for batching database queries
//!
//! `allAuthors { bookCount }` would otherwise issue one COUNT per author.
//! The loader collects the author ids requested within the same tick and
//! answers them with a single grouped query.
//!
//! Loaders are registered without a cache, so every request sees current data.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dataloader::Loader;

use crate::db::{Database, StoreError};

/// Counts books per author id
pub struct BookCountLoader {
    db: Database,
}

impl BookCountLoader {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl Loader<String> for BookCountLoader {
    type Value = i64;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[String]) -> Result<HashMap<String, Self::Value>, Self::Error> {
        tracing::debug!(author_count = keys.len(), "Batch loading book counts");
        self.db.books().count_by_author(keys).await.map_err(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewAuthor, NewBook};
    use async_graphql::dataloader::DataLoader;

    #[tokio::test]
    async fn test_missing_authors_have_no_entry() {
        let db = Database::in_memory().await.unwrap();
        let author = db
            .authors()
            .create(NewAuthor {
                name: "Sandi Metz".to_string(),
                born: None,
            })
            .await
            .unwrap();
        db.books()
            .create(NewBook {
                title: "Practical Object-Oriented Design".to_string(),
                published: 2012,
                author_id: author.id.clone(),
                genres: vec!["design".to_string()],
            })
            .await
            .unwrap();

        let loader = DataLoader::new(BookCountLoader::new(db), tokio::spawn);
        let counts = loader
            .load_many(vec![author.id.clone(), "unknown".to_string()])
            .await
            .unwrap();

        assert_eq!(counts.get(&author.id), Some(&1));
        assert_eq!(counts.get("unknown"), None);
    }
}
