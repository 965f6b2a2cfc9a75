//! Starter catalog inserted on first startup.
//!
//! Authors are inserted with `INSERT OR IGNORE` on their unique name. Books are
//! only inserted while the books table is empty, so re-runs never duplicate them.

use tracing::{debug, info, warn};

use super::{Database, NewAuthor, NewBook, StoreError};

/// Result of running seed operations.
#[derive(Debug, Default)]
pub struct SeedResult {
    pub authors_inserted: u64,
    pub books_inserted: u64,
    pub errors: Vec<String>,
}

struct SeedAuthor {
    name: &'static str,
    born: Option<i32>,
}

struct SeedBook {
    title: &'static str,
    published: i32,
    author: &'static str,
    genres: &'static [&'static str],
}

const AUTHORS: &[SeedAuthor] = &[
    SeedAuthor {
        name: "Robert Martin",
        born: Some(1952),
    },
    SeedAuthor {
        name: "Martin Fowler",
        born: Some(1963),
    },
    SeedAuthor {
        name: "Fyodor Dostoevsky",
        born: Some(1821),
    },
    SeedAuthor {
        name: "Joshua Kerievsky",
        born: None,
    },
    SeedAuthor {
        name: "Sandi Metz",
        born: None,
    },
];

const BOOKS: &[SeedBook] = &[
    SeedBook {
        title: "Clean Code",
        published: 2008,
        author: "Robert Martin",
        genres: &["refactoring"],
    },
    SeedBook {
        title: "Agile software development",
        published: 2002,
        author: "Robert Martin",
        genres: &["agile", "patterns", "design"],
    },
    SeedBook {
        title: "Refactoring, edition 2",
        published: 2018,
        author: "Martin Fowler",
        genres: &["refactoring"],
    },
    SeedBook {
        title: "Refactoring to patterns",
        published: 2008,
        author: "Joshua Kerievsky",
        genres: &["refactoring", "patterns"],
    },
    SeedBook {
        title: "Practical Object-Oriented Design, An Agile Primer Using Ruby",
        published: 2012,
        author: "Sandi Metz",
        genres: &["refactoring", "design"],
    },
    SeedBook {
        title: "Crime and punishment",
        published: 1866,
        author: "Fyodor Dostoevsky",
        genres: &["classic", "crime"],
    },
    SeedBook {
        title: "Demons",
        published: 1872,
        author: "Fyodor Dostoevsky",
        genres: &["classic", "revolution"],
    },
];

async fn seed_authors(db: &Database) -> Result<u64, StoreError> {
    let authors = db.authors();
    let mut inserted = 0;
    for seed in AUTHORS {
        let author = NewAuthor {
            name: seed.name.to_string(),
            born: seed.born,
        };
        if authors.insert_if_missing(&author).await? {
            inserted += 1;
        }
    }
    Ok(inserted)
}

async fn seed_books(db: &Database) -> Result<u64, StoreError> {
    let books = db.books();
    if books.count().await? > 0 {
        debug!("Books already present, skipping book seed");
        return Ok(0);
    }

    let authors = db.authors();
    let mut inserted = 0;
    for seed in BOOKS {
        let Some(author) = authors.get_by_name(seed.author).await? else {
            warn!(author = seed.author, title = seed.title, "Seed author missing, skipping book");
            continue;
        };
        books
            .create(NewBook {
                title: seed.title.to_string(),
                published: seed.published,
                author_id: author.id,
                genres: seed.genres.iter().map(|g| g.to_string()).collect(),
            })
            .await?;
        inserted += 1;
    }
    Ok(inserted)
}

/// Insert the starter catalog. Failures are collected, never fatal.
pub async fn run_seeds(db: &Database) -> SeedResult {
    let mut result = SeedResult::default();

    match seed_authors(db).await {
        Ok(n) => result.authors_inserted = n,
        Err(e) => {
            let msg = format!("Seed authors: {}", e);
            warn!("{}", msg);
            result.errors.push(msg);
        }
    }

    match seed_books(db).await {
        Ok(n) => result.books_inserted = n,
        Err(e) => {
            let msg = format!("Seed books: {}", e);
            warn!("{}", msg);
            result.errors.push(msg);
        }
    }

    if result.authors_inserted > 0 || result.books_inserted > 0 {
        info!(
            authors = result.authors_inserted,
            books = result.books_inserted,
            "Starter catalog seeded"
        );
    }

    result
}
