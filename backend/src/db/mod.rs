//! Database connection and repositories
//!
//! The catalog lives in SQLite. Each collection (authors, books, users) has a
//! repository borrowed from [Database]; the handle is constructed once in
//! `main` and passed to everything that needs it.

pub mod authors;
pub mod books;
pub mod schema;
pub mod secrets;
pub mod seed;
pub mod sqlite_helpers;
pub mod users;

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use authors::{AuthorRecord, AuthorRepository, NewAuthor};
pub use books::{BookFilter, BookRecord, BookRepository, BookWithAuthor, NewBook};
pub use secrets::SecretsRepository;
pub use users::{NewUser, UserRecord, UsersRepository};

/// Errors raised by repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A field failed validation before reaching the store
    #[error("{0}")]
    Invalid(String),

    /// A unique index rejected the write
    #[error("{field} must be unique: '{value}' already exists")]
    Duplicate { field: &'static str, value: String },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    /// Map a write error, turning unique-index violations into [StoreError::Duplicate].
    pub(crate) fn from_write(err: sqlx::Error, field: &'static str, value: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate {
                    field,
                    value: value.to_string(),
                }
            }
            _ => StoreError::Sqlx(err),
        }
    }
}

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to the store and make sure its tables exist.
    ///
    /// In-memory databases live and die with their connection, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true);

        if !is_memory_url(url)
            && let Some(parent) = options.get_filename().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
        }

        let pool = if is_memory_url(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .connect_with(options)
                .await
        }
        .context("Failed to connect to database")?;

        let db = Self { pool };
        schema::ensure_schema(&db.pool)
            .await
            .context("Failed to create catalog tables")?;
        Ok(db)
    }

    /// Fresh in-memory store, used by tests
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trip a trivial query. Fails once the pool is closed.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Get an author repository
    pub fn authors(&self) -> AuthorRepository {
        AuthorRepository::new(self.pool.clone())
    }

    /// Get a book repository
    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    /// Get a users repository
    pub fn users(&self) -> UsersRepository {
        UsersRepository::new(self.pool.clone())
    }

    /// Get the auth secrets repository
    pub fn secrets(&self) -> SecretsRepository {
        SecretsRepository::new(self.pool.clone())
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_url_detection() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://file:catalog?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite://./data/catalog.db"));
    }

    #[tokio::test]
    async fn test_ping_fails_after_close() {
        let db = Database::in_memory().await.unwrap();
        db.ping().await.unwrap();

        db.close().await;
        assert!(matches!(
            db.ping().await,
            Err(StoreError::Sqlx(sqlx::Error::PoolClosed))
        ));
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        let url = format!("sqlite://{}", path.display());

        let db = Database::connect(&url, 2).await.unwrap();
        assert_eq!(db.authors().count().await.unwrap(), 0);
        db.close().await;

        assert!(path.exists());
    }
}
