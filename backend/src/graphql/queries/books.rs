use super::prelude::*;

#[derive(Default)]
pub struct BookQueries;

#[Object]
impl BookQueries {
    /// Total number of books
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let db = ctx.data_unchecked::<Database>();
        let count = db
            .books()
            .count()
            .await
            .map_err(|e| CatalogError::from(e).extend())?;
        Ok(count as i32)
    }

    /// Books with their authors. `author` matches any part of the author's
    /// name regardless of case; `genre` must equal one of the book's genres.
    async fn all_books(
        &self,
        ctx: &Context<'_>,
        author: Option<String>,
        genre: Option<String>,
    ) -> Result<Vec<Book>> {
        let db = ctx.data_unchecked::<Database>();
        let filter = BookFilter { author, genre };

        let books = db
            .books()
            .list_with_authors(&filter)
            .await
            .map_err(|e| CatalogError::from(e).extend())?;

        tracing::debug!(
            author = ?filter.author,
            genre = ?filter.genre,
            count = books.len(),
            "Listed books"
        );
        Ok(books.into_iter().map(Book::from).collect())
    }
}
