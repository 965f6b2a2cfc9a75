//! Authentication service for user signup, login and JWT handling
//!
//! Provides:
//! - User registration with per-user bcrypt password hashes
//! - Login with credential verification
//! - HS256 token issuing and validation
//! - Resolution of a bearer token to the stored user

use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Database, NewUser, StoreError, UserRecord};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims embedded in every bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID
    pub id: String,
    /// Username
    pub username: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or password mismatch. Deliberately vague.
    #[error("wrong credentials")]
    WrongCredentials,

    #[error("password must be at least {MIN_PASSWORD_LEN} characters long")]
    WeakPassword,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 24 hours)
    pub token_lifetime: i64,
    /// Bcrypt cost factor (default: 12)
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_lifetime: 24 * 60 * 60,
            bcrypt_cost: DEFAULT_COST,
        }
    }
}

/// Signup input, before hashing
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub favorite_genre: String,
    pub password: String,
}

// ============================================================================
// Auth Service
// ============================================================================

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Register a new user
    pub async fn create_user(&self, input: SignupInput) -> Result<UserRecord, AuthError> {
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let password_hash = self.hash_password(input.password).await?;
        let user = self
            .db
            .users()
            .create(NewUser {
                username: input.username,
                favorite_genre: input.favorite_genre,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Login with username and password, returning a signed token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let Some(user) = self.db.users().get_by_username(username).await? else {
            tracing::debug!(username, "Login for unknown user");
            return Err(AuthError::WrongCredentials);
        };

        if !self
            .verify_password(password.to_string(), user.password_hash.clone())
            .await?
        {
            tracing::debug!(username, "Login with wrong password");
            return Err(AuthError::WrongCredentials);
        }

        self.issue_token(&user)
    }

    /// Sign a token carrying the user's id and username
    pub fn issue_token(&self, user: &UserRecord) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            id: user.id.clone(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.config.token_lifetime)).timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Check signature and expiry and return the embedded claims
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )?;
        Ok(token_data.claims)
    }

    /// Resolve a bearer token to the stored user.
    ///
    /// Any failure (bad signature, expired, user gone, store error) yields `None`.
    pub async fn current_user(&self, token: &str) -> Option<UserRecord> {
        let claims = match self.verify_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Token verification failed");
                return None;
            }
        };

        match self.db.users().get_by_id(&claims.id).await {
            Ok(Some(user)) if user.username == claims.username => Some(user),
            Ok(_) => {
                tracing::debug!(user_id = %claims.id, "Token refers to unknown user");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load user for token");
                None
            }
        }
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Hash a password with bcrypt off the async workers
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let cost = self.config.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(password, cost)).await??;
        Ok(hashed)
    }

    /// Verify a password against a hash
    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let ok = tokio::task::spawn_blocking(move || verify(password, &hash)).await??;
        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    async fn service() -> AuthService {
        let db = Database::in_memory().await.unwrap();
        AuthService::new(
            db,
            AuthConfig {
                jwt_secret: "test-secret".to_string(),
                token_lifetime: 3600,
                bcrypt_cost: 4,
            },
        )
    }

    fn signup(username: &str) -> SignupInput {
        SignupInput {
            username: username.to_string(),
            favorite_genre: "classic".to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let auth = service().await;
        let user = auth.create_user(signup("mluukkai")).await.unwrap();
        assert_ne!(user.password_hash, "correct horse");
        assert!(user.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn test_weak_password_rejected() {
        let auth = service().await;
        let mut input = signup("mluukkai");
        input.password = "short".to_string();
        assert_matches!(auth.create_user(input).await, Err(AuthError::WeakPassword));
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let auth = service().await;
        let user = auth.create_user(signup("mluukkai")).await.unwrap();

        let token = auth.login("mluukkai", "correct horse").await.unwrap();
        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.username, "mluukkai");
        assert_eq!(claims.exp - claims.iat, 3600);

        assert_eq!(auth.current_user(&token).await, Some(user));
    }

    #[tokio::test]
    async fn test_wrong_credentials() {
        let auth = service().await;
        auth.create_user(signup("mluukkai")).await.unwrap();

        assert_matches!(
            auth.login("mluukkai", "wrong password").await,
            Err(AuthError::WrongCredentials)
        );
        assert_matches!(
            auth.login("nobody", "correct horse").await,
            Err(AuthError::WrongCredentials)
        );
    }

    #[tokio::test]
    async fn test_foreign_and_garbage_tokens() {
        let auth = service().await;
        let user = auth.create_user(signup("mluukkai")).await.unwrap();

        let other = AuthService::new(
            Database::in_memory().await.unwrap(),
            AuthConfig {
                jwt_secret: "another-secret".to_string(),
                token_lifetime: 3600,
                bcrypt_cost: 4,
            },
        );
        let foreign = other.issue_token(&user).unwrap();

        assert_matches!(auth.verify_token(&foreign), Err(AuthError::InvalidToken(_)));
        assert_eq!(auth.current_user(&foreign).await, None);
        assert_eq!(auth.current_user("not.a.token").await, None);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let auth = service().await;
        let user = auth.create_user(signup("mluukkai")).await.unwrap();

        let expired = AuthService::new(
            Database::in_memory().await.unwrap(),
            AuthConfig {
                jwt_secret: "test-secret".to_string(),
                token_lifetime: -3600,
                bcrypt_cost: 4,
            },
        )
        .issue_token(&user)
        .unwrap();

        assert_matches!(auth.verify_token(&expired), Err(AuthError::InvalidToken(_)));
        assert_eq!(auth.current_user(&expired).await, None);
    }
}
