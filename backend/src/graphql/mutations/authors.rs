use super::prelude::*;
use crate::db::NewAuthor;

#[derive(Debug, Clone, Serialize)]
pub struct AddAuthorArgs {
    pub name: String,
    pub born: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditAuthorArgs {
    pub name: String,
    pub set_born_to: i32,
}

#[derive(Default)]
pub struct AuthorMutations;

#[Object]
impl AuthorMutations {
    /// Add an author. Names are unique.
    #[graphql(guard = "AuthGuard")]
    async fn add_author(
        &self,
        ctx: &Context<'_>,
        name: String,
        born: Option<i32>,
    ) -> Result<Option<Author>> {
        let db = ctx.data_unchecked::<Database>();
        let args = AddAuthorArgs { name, born };
        let invalid_args = serde_json::to_value(&args).unwrap_or_default();

        let author = db
            .authors()
            .create(NewAuthor {
                name: args.name,
                born: args.born,
            })
            .await
            .map_err(|e| CatalogError::from_store(e, invalid_args).extend())?;

        tracing::info!(author_id = %author.id, name = %author.name, "Author added");
        Ok(Some(author.into()))
    }

    /// Set the birth year of the author with this exact name.
    /// Fails with NOT_FOUND when there is no such author.
    #[graphql(guard = "AuthGuard")]
    async fn edit_author(
        &self,
        ctx: &Context<'_>,
        name: String,
        set_born_to: i32,
    ) -> Result<Option<Author>> {
        let db = ctx.data_unchecked::<Database>();
        let args = EditAuthorArgs { name, set_born_to };

        let updated = db
            .authors()
            .set_born(&args.name, args.set_born_to)
            .await
            .map_err(|e| {
                let invalid_args = serde_json::to_value(&args).unwrap_or_default();
                CatalogError::from_store(e, invalid_args).extend()
            })?;

        match updated {
            Some(author) => {
                tracing::info!(author_id = %author.id, born = args.set_born_to, "Author edited");
                Ok(Some(author.into()))
            }
            None => Err(CatalogError::NotFound {
                entity: "Author",
                key: args.name,
            }
            .extend()),
        }
    }
}
