use super::prelude::*;
use crate::db::{BookWithAuthor, NewBook};

/// Arguments of `addBook`, echoed back in validation errors
#[derive(Debug, Clone, Serialize)]
pub struct AddBookArgs {
    pub title: String,
    pub author: String,
    pub published: i32,
    pub genres: Vec<String>,
}

#[derive(Default)]
pub struct BookMutations;

#[Object]
impl BookMutations {
    /// Add a book by an existing author. The result is nullable in the
    /// published schema but always set on success.
    #[graphql(guard = "AuthGuard")]
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        author: String,
        published: i32,
        genres: Vec<String>,
    ) -> Result<Option<Book>> {
        let user = ctx.current_user()?;
        let db = ctx.data_unchecked::<Database>();
        let args = AddBookArgs {
            title,
            author,
            published,
            genres,
        };
        let invalid_args = serde_json::to_value(&args).unwrap_or_default();

        let author = db
            .authors()
            .get_by_name(&args.author)
            .await
            .map_err(|e| CatalogError::from_store(e, invalid_args.clone()).extend())?
            .ok_or_else(|| {
                CatalogError::validation("Author not found", invalid_args.clone()).extend()
            })?;

        let book = db
            .books()
            .create(NewBook {
                title: args.title,
                published: args.published,
                author_id: author.id.clone(),
                genres: args.genres,
            })
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Book could not be saved");
                CatalogError::from_store(e, invalid_args).extend()
            })?;

        tracing::info!(
            book_id = %book.id,
            author = %author.name,
            user = %user.username,
            "Book added"
        );

        Ok(Some(Book::from(BookWithAuthor { book, author })))
    }
}
