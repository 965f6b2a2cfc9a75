//! Table bootstrap for the catalog store.
//!
//! Tables and indexes are created with `IF NOT EXISTS`, so running this on
//! every startup is safe. Column renames or type changes are not handled.

use sqlx::SqlitePool;
use tracing::debug;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "authors",
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            born INTEGER,
            created_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "books",
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            published INTEGER NOT NULL,
            author_id TEXT NOT NULL REFERENCES authors(id),
            genres TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "idx_books_author_id",
        "CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id)",
    ),
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            favorite_genre TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "auth_secrets",
        r#"
        CREATE TABLE IF NOT EXISTS auth_secrets (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    ),
];

/// Create every catalog table and index that does not exist yet
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for (name, sql) in STATEMENTS {
        debug!(object = name, "Ensuring schema object");
        sqlx::query(sql).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[tokio::test]
    async fn test_ensure_schema_is_repeatable() {
        let db = Database::in_memory().await.unwrap();
        ensure_schema(db.pool()).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();
        let names: Vec<String> = tables.into_iter().map(|(n,)| n).collect();

        assert_eq!(names, vec!["auth_secrets", "authors", "books", "users"]);
    }
}
