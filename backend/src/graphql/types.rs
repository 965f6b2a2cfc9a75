//! GraphQL object types: Book, Author, User, Token

use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, ErrorExtensions, ID, Result, SimpleObject};

use crate::db::{AuthorRecord, BookWithAuthor, UserRecord};

use super::errors::CatalogError;
use super::loaders::BookCountLoader;

#[derive(Debug, Clone, PartialEq, SimpleObject)]
#[graphql(complex)]
pub struct Author {
    pub name: String,
    pub id: ID,
    pub born: Option<i32>,
}

#[ComplexObject]
impl Author {
    /// Number of books referencing this author
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let loader = ctx.data_unchecked::<DataLoader<BookCountLoader>>();
        let count = loader
            .load_one(self.id.to_string())
            .await
            .map_err(|e| CatalogError::Internal(e.to_string()).extend())?;
        Ok(count.unwrap_or(0) as i32)
    }
}

impl From<AuthorRecord> for Author {
    fn from(r: AuthorRecord) -> Self {
        Self {
            name: r.name,
            id: ID(r.id),
            born: r.born,
        }
    }
}

#[derive(Debug, Clone, PartialEq, SimpleObject)]
pub struct Book {
    pub title: String,
    pub published: i32,
    pub author: Author,
    pub genres: Vec<String>,
    pub id: ID,
}

impl From<BookWithAuthor> for Book {
    fn from(entry: BookWithAuthor) -> Self {
        Self {
            title: entry.book.title,
            published: entry.book.published,
            author: entry.author.into(),
            genres: entry.book.genres,
            id: ID(entry.book.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, SimpleObject)]
pub struct User {
    pub username: String,
    pub favorite_genre: String,
    pub id: ID,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            username: r.username,
            favorite_genre: r.favorite_genre,
            id: ID(r.id),
        }
    }
}

/// Signed bearer token returned by `login`
#[derive(Debug, Clone, PartialEq, SimpleObject)]
pub struct Token {
    pub value: String,
}
