use super::prelude::*;
use crate::services::AuthService;
use crate::services::auth::SignupInput;
use std::sync::Arc;

/// Echoed back on signup failures. The password is deliberately absent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserArgs {
    pub username: String,
    pub favorite_genre: String,
}

#[derive(Default)]
pub struct UserMutations;

#[Object]
impl UserMutations {
    /// Sign up. Usernames are unique.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        favorite_genre: String,
        #[graphql(secret)] password: String,
    ) -> Result<Option<User>> {
        let auth = ctx.data_unchecked::<Arc<AuthService>>();
        let args = CreateUserArgs {
            username,
            favorite_genre,
        };
        let invalid_args = serde_json::to_value(&args).unwrap_or_default();

        let user = auth
            .create_user(SignupInput {
                username: args.username,
                favorite_genre: args.favorite_genre,
                password,
            })
            .await
            .map_err(|e| CatalogError::from_auth(e, invalid_args).extend())?;

        Ok(Some(user.into()))
    }

    /// Exchange credentials for a bearer token
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        #[graphql(secret)] password: String,
    ) -> Result<Option<Token>> {
        let auth = ctx.data_unchecked::<Arc<AuthService>>();
        let invalid_args = serde_json::json!({ "username": username });

        let value = auth
            .login(&username, &password)
            .await
            .map_err(|e| CatalogError::from_auth(e, invalid_args).extend())?;

        tracing::info!(username = %username, "User logged in");
        Ok(Some(Token { value }))
    }
}
