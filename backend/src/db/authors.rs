//! Authors repository

use sqlx::{FromRow, SqlitePool};

use super::StoreError;
use super::sqlite_helpers::{new_id, now_iso8601};

/// Minimum length of an author name
pub const MIN_NAME_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AuthorRecord {
    pub id: String,
    pub name: String,
    pub born: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub name: String,
    pub born: Option<i32>,
}

impl NewAuthor {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().chars().count() < MIN_NAME_LEN {
            return Err(StoreError::Invalid(format!(
                "author name must be at least {} characters long",
                MIN_NAME_LEN
            )));
        }
        Ok(())
    }
}

pub struct AuthorRepository {
    pool: SqlitePool,
}

impl AuthorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new author
    pub async fn create(&self, author: NewAuthor) -> Result<AuthorRecord, StoreError> {
        author.validate()?;
        let name = author.name.trim().to_string();
        let id = new_id();

        sqlx::query("INSERT INTO authors (id, name, born, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&name)
            .bind(author.born)
            .bind(now_iso8601())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(e, "name", &name))?;

        Ok(AuthorRecord {
            id,
            name,
            born: author.born,
        })
    }

    /// Get an author by exact name
    pub async fn get_by_name(&self, name: &str) -> Result<Option<AuthorRecord>, StoreError> {
        let record = sqlx::query_as::<_, AuthorRecord>(
            "SELECT id, name, born FROM authors WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Get an author by id
    pub async fn get_by_id(&self, id: &str) -> Result<Option<AuthorRecord>, StoreError> {
        let record = sqlx::query_as::<_, AuthorRecord>(
            "SELECT id, name, born FROM authors WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// All authors in insertion order
    pub async fn list(&self) -> Result<Vec<AuthorRecord>, StoreError> {
        let records = sqlx::query_as::<_, AuthorRecord>(
            "SELECT id, name, born FROM authors ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Set the birth year of the author with this exact name.
    ///
    /// Single-statement update, so concurrent edits resolve at row level.
    /// Returns `None` when no author has that name.
    pub async fn set_born(&self, name: &str, born: i32) -> Result<Option<AuthorRecord>, StoreError> {
        let record = sqlx::query_as::<_, AuthorRecord>(
            "UPDATE authors SET born = ? WHERE name = ? RETURNING id, name, born",
        )
        .bind(born)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Insert an author unless the name is already taken. Returns true when a
    /// row was written.
    pub async fn insert_if_missing(&self, author: &NewAuthor) -> Result<bool, StoreError> {
        author.validate()?;
        let result = sqlx::query(
            "INSERT OR IGNORE INTO authors (id, name, born, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(new_id())
        .bind(author.name.trim())
        .bind(author.born)
        .bind(now_iso8601())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
