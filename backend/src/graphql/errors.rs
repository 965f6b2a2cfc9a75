//! User-visible GraphQL errors.
//!
//! Every failure leaving a resolver goes through [CatalogError] so clients can
//! branch on `extensions.code`.

use async_graphql::{ErrorExtensions, Value};
use thiserror::Error;

use crate::db::StoreError;
use crate::services::auth::AuthError;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Bad input or a store constraint violation. `invalid_args` echoes the
    /// arguments the client sent.
    #[error("{message}")]
    Validation {
        message: String,
        invalid_args: serde_json::Value,
    },

    #[error("not authenticated")]
    Unauthenticated,

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Store failure while answering a read-only query
    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn validation(message: impl Into<String>, invalid_args: serde_json::Value) -> Self {
        CatalogError::Validation {
            message: message.into(),
            invalid_args,
        }
    }

    /// Wrap a store failure raised by a mutation
    pub fn from_store(err: StoreError, invalid_args: serde_json::Value) -> Self {
        CatalogError::validation(err.to_string(), invalid_args)
    }

    /// Wrap an auth failure raised by a mutation
    pub fn from_auth(err: AuthError, invalid_args: serde_json::Value) -> Self {
        match err {
            AuthError::Hash(_) | AuthError::Task(_) => CatalogError::Internal(err.to_string()),
            other => CatalogError::validation(other.to_string(), invalid_args),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::Validation { .. } => "BAD_USER_INPUT",
            CatalogError::Unauthenticated => "UNAUTHENTICATED",
            CatalogError::NotFound { .. } => "NOT_FOUND",
            CatalogError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Store query failed");
        CatalogError::Internal(err.to_string())
    }
}

impl ErrorExtensions for CatalogError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            if let CatalogError::Validation { invalid_args, .. } = self {
                e.set(
                    "invalidArgs",
                    Value::from_json(invalid_args.clone()).unwrap_or(Value::Null),
                );
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_validation_carries_args() {
        let err = CatalogError::validation("Author not found", json!({ "author": "Nobody" }))
            .extend();
        assert_eq!(err.message, "Author not found");

        let extensions = err.extensions.unwrap();
        assert_eq!(extensions.get("code"), Some(&Value::from("BAD_USER_INPUT")));
        let args = extensions.get("invalidArgs").unwrap().clone().into_json().unwrap();
        assert_eq!(args, json!({ "author": "Nobody" }));
    }

    #[test]
    fn test_codes() {
        assert_eq!(CatalogError::Unauthenticated.code(), "UNAUTHENTICATED");
        assert_eq!(
            CatalogError::NotFound {
                entity: "Author",
                key: "Nobody".to_string()
            }
            .to_string(),
            "Author not found: Nobody"
        );
        assert_eq!(
            CatalogError::from_auth(AuthError::WrongCredentials, json!({})).code(),
            "BAD_USER_INPUT"
        );
    }
}
