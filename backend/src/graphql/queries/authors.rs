use super::prelude::*;

#[derive(Default)]
pub struct AuthorQueries;

#[Object]
impl AuthorQueries {
    /// Total number of authors
    async fn author_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let db = ctx.data_unchecked::<Database>();
        let count = db
            .authors()
            .count()
            .await
            .map_err(|e| CatalogError::from(e).extend())?;
        Ok(count as i32)
    }

    /// All authors; `bookCount` is computed per request
    async fn all_authors(&self, ctx: &Context<'_>) -> Result<Vec<Author>> {
        let db = ctx.data_unchecked::<Database>();
        let authors = db
            .authors()
            .list()
            .await
            .map_err(|e| CatalogError::from(e).extend())?;
        Ok(authors.into_iter().map(Author::from).collect())
    }
}
