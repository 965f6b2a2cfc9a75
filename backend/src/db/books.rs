//! Books repository
//!
//! Books are immutable once written. Listing always joins the author so
//! callers get a populated reference.

use std::collections::HashMap;

use sqlx::{FromRow, SqlitePool};

use super::StoreError;
use super::authors::AuthorRecord;
use super::sqlite_helpers::{json_to_vec, new_id, now_iso8601, placeholders, vec_to_json};

/// Minimum length of a book title
pub const MIN_TITLE_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub published: i32,
    pub author_id: String,
    pub genres: Vec<String>,
}

/// A book together with the author it references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookWithAuthor {
    pub book: BookRecord,
    pub author: AuthorRecord,
}

#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub published: i32,
    pub author_id: String,
    pub genres: Vec<String>,
}

impl NewBook {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.title.trim().chars().count() < MIN_TITLE_LEN {
            return Err(StoreError::Invalid(format!(
                "book title must be at least {} characters long",
                MIN_TITLE_LEN
            )));
        }
        if self.genres.iter().any(|g| g.trim().is_empty()) {
            return Err(StoreError::Invalid("genres must not be blank".to_string()));
        }
        Ok(())
    }
}

/// Filters for listing books. Both filters combine with AND.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// Case-insensitive substring of the author's name
    pub author: Option<String>,
    /// Exact genre tag
    pub genre: Option<String>,
}

impl BookFilter {
    pub fn matches(&self, entry: &BookWithAuthor) -> bool {
        let author_ok = match &self.author {
            Some(needle) => entry
                .author
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        };
        let genre_ok = match &self.genre {
            Some(genre) => entry.book.genres.iter().any(|g| g == genre),
            None => true,
        };
        author_ok && genre_ok
    }
}

#[derive(FromRow)]
struct BookAuthorRow {
    id: String,
    title: String,
    published: i32,
    genres: String,
    author_id: String,
    author_name: String,
    author_born: Option<i32>,
}

impl From<BookAuthorRow> for BookWithAuthor {
    fn from(row: BookAuthorRow) -> Self {
        BookWithAuthor {
            book: BookRecord {
                id: row.id,
                title: row.title,
                published: row.published,
                author_id: row.author_id.clone(),
                genres: json_to_vec(&row.genres),
            },
            author: AuthorRecord {
                id: row.author_id,
                name: row.author_name,
                born: row.author_born,
            },
        }
    }
}

pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new book. The author must already exist.
    pub async fn create(&self, book: NewBook) -> Result<BookRecord, StoreError> {
        book.validate()?;
        let id = new_id();
        let title = book.title.trim().to_string();

        sqlx::query(
            r#"
            INSERT INTO books (id, title, published, author_id, genres, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&title)
        .bind(book.published)
        .bind(&book.author_id)
        .bind(vec_to_json(&book.genres))
        .bind(now_iso8601())
        .execute(&self.pool)
        .await?;

        Ok(BookRecord {
            id,
            title,
            published: book.published,
            author_id: book.author_id,
            genres: book.genres,
        })
    }

    /// Books with their authors in insertion order, narrowed by `filter`
    pub async fn list_with_authors(
        &self,
        filter: &BookFilter,
    ) -> Result<Vec<BookWithAuthor>, StoreError> {
        let rows = sqlx::query_as::<_, BookAuthorRow>(
            r#"
            SELECT b.id, b.title, b.published, b.genres, b.author_id,
                   a.name AS author_name, a.born AS author_born
            FROM books b
            JOIN authors a ON a.id = b.author_id
            ORDER BY b.rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(BookWithAuthor::from)
            .filter(|entry| filter.matches(entry))
            .collect())
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of books per author id. Authors without books are absent.
    pub async fn count_by_author(
        &self,
        author_ids: &[String],
    ) -> Result<HashMap<String, i64>, StoreError> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT author_id, COUNT(*) FROM books WHERE author_id IN ({}) GROUP BY author_id",
            placeholders(author_ids.len())
        );
        let mut query = sqlx::query_as::<_, (String, i64)>(&sql);
        for id in author_ids {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().collect())
    }
}
