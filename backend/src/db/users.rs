//! Users repository
//!
//! Users are written once at signup and never updated. Only the bcrypt hash of
//! the password is stored.

use sqlx::{FromRow, SqlitePool};

use super::StoreError;
use super::sqlite_helpers::{new_id, now_iso8601};

/// Minimum length of a username
pub const MIN_USERNAME_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub favorite_genre: String,
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub favorite_genre: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.username.trim().chars().count() < MIN_USERNAME_LEN {
            return Err(StoreError::Invalid(format!(
                "username must be at least {} characters long",
                MIN_USERNAME_LEN
            )));
        }
        if self.favorite_genre.trim().is_empty() {
            return Err(StoreError::Invalid(
                "favorite genre must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        user.validate()?;
        let record = UserRecord {
            id: new_id(),
            username: user.username.trim().to_string(),
            favorite_genre: user.favorite_genre.trim().to_string(),
            password_hash: user.password_hash,
            created_at: now_iso8601(),
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, username, favorite_genre, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.username)
        .bind(&record.favorite_genre)
        .bind(&record.password_hash)
        .bind(&record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(e, "username", &record.username))?;

        Ok(record)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, favorite_genre, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Get user by exact username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, favorite_genre, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use assert_matches::assert_matches;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            favorite_genre: "refactoring".to_string(),
            password_hash: "$2b$04$not-a-real-hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let db = Database::in_memory().await.unwrap();
        let users = db.users();

        let created = users.create(new_user("mluukkai")).await.unwrap();
        assert_eq!(
            users.get_by_username("mluukkai").await.unwrap(),
            Some(created.clone())
        );
        assert_eq!(users.get_by_id(&created.id).await.unwrap(), Some(created));
        assert_eq!(users.get_by_username("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = Database::in_memory().await.unwrap();
        let users = db.users();
        users.create(new_user("mluukkai")).await.unwrap();

        let err = users.create(new_user("mluukkai")).await.unwrap_err();
        assert_matches!(err, StoreError::Duplicate { field: "username", .. });
        assert_eq!(
            err.to_string(),
            "username must be unique: 'mluukkai' already exists"
        );
    }

    #[tokio::test]
    async fn test_validation() {
        let db = Database::in_memory().await.unwrap();
        let err = db.users().create(new_user("ab")).await.unwrap_err();
        assert_matches!(err, StoreError::Invalid(_));

        let mut blank_genre = new_user("mluukkai");
        blank_genre.favorite_genre = "  ".to_string();
        let err = db.users().create(blank_genre).await.unwrap_err();
        assert_matches!(err, StoreError::Invalid(_));
    }
}
