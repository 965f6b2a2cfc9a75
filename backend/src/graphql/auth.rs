//! GraphQL authentication
//!
//! The HTTP handler turns a bearer token into a [CurrentUser] attached to the
//! request. Resolvers read it through [AuthExt]; operations that require a
//! signed-in caller use [AuthGuard]:
//!
//! ```ignore
//! #[graphql(guard = "AuthGuard")]
//! async fn add_book(&self, ctx: &Context<'_>, ...) -> Result<Option<Book>> { ... }
//! ```

use async_graphql::{Context, ErrorExtensions, Result};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use crate::db::UserRecord;
use crate::services::AuthService;

use super::errors::CatalogError;

/// The authenticated caller of the current request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

/// Extract the bearer token from an Authorization header
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| {
            h.strip_prefix("Bearer ")
                .or_else(|| h.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the request's current user. Missing or bad tokens are not errors.
pub async fn resolve_current_user(auth: &AuthService, headers: &HeaderMap) -> Option<CurrentUser> {
    let Some(token) = extract_token(headers) else {
        tracing::debug!("No auth token in request headers");
        return None;
    };
    auth.current_user(token).await.map(CurrentUser)
}

/// Extension trait to get the authenticated user from GraphQL context
pub trait AuthExt {
    /// Get the authenticated user, or fail with `UNAUTHENTICATED`
    fn current_user(&self) -> Result<&UserRecord>;

    /// Get the authenticated user if present
    fn try_current_user(&self) -> Option<&UserRecord>;
}

impl<'a> AuthExt for Context<'a> {
    fn current_user(&self) -> Result<&UserRecord> {
        self.try_current_user()
            .ok_or_else(|| CatalogError::Unauthenticated.extend())
    }

    fn try_current_user(&self) -> Option<&UserRecord> {
        self.data_opt::<CurrentUser>().map(|u| &u.0)
    }
}

/// Guard that requires authentication for GraphQL operations.
///
/// Runs before the resolver body, so a rejected call never reaches the store.
pub struct AuthGuard;

impl async_graphql::Guard for AuthGuard {
    fn check(&self, ctx: &Context<'_>) -> impl std::future::Future<Output = Result<()>> + Send {
        let result = ctx.current_user().map(|_| ());
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(extract_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_token(&headers("Bearer ")), None);
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }
}
