//! Persisted auth secrets.
//!
//! Holds the JWT signing secret when none is configured, so issued tokens
//! stay valid across restarts. Never exposed via GraphQL.

use base64::Engine;
use sqlx::SqlitePool;
use tracing::info;

use super::StoreError;

const JWT_SECRET_KEY: &str = "jwt_secret";

pub struct SecretsRepository {
    pool: SqlitePool,
}

impl SecretsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Return the stored JWT secret, generating and storing one if missing or empty
    pub async fn jwt_secret(&self) -> Result<String, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM auth_secrets WHERE key = ?")
            .bind(JWT_SECRET_KEY)
            .fetch_optional(&self.pool)
            .await?;

        if let Some((value,)) = row
            && !value.trim().is_empty()
        {
            return Ok(value);
        }

        let secret = generate_secret();
        sqlx::query("INSERT OR REPLACE INTO auth_secrets (key, value) VALUES (?, ?)")
            .bind(JWT_SECRET_KEY)
            .bind(&secret)
            .execute(&self.pool)
            .await?;
        info!("JWT secret generated and stored in database");
        Ok(secret)
    }
}

fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    #[tokio::test]
    async fn test_secret_is_stable() {
        let db = Database::in_memory().await.unwrap();
        let first = db.secrets().jwt_secret().await.unwrap();
        let second = db.secrets().jwt_secret().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 44);
    }
}
