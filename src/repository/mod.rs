//! Repository layer for database operations
//!
//! Every store operation runs inside its own [`Session`]: a transaction opened
//! on entry and either committed or rolled back when dropped, so the pooled
//! connection is always released when the operation returns.

pub mod authors;
pub mod books;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{Author, BookDetails},
};

/// Scoped store handle for a single operation
pub type Session = Transaction<'static, Postgres>;

/// Open a new session on the pool
pub async fn open_session(pool: &Pool<Postgres>) -> AppResult<Session> {
    Ok(pool.begin().await?)
}

/// Map a foreign key violation raised by the store onto a domain error,
/// leaving every other failure as a database error.
pub(crate) fn map_foreign_key<F>(error: sqlx::Error, on_violation: F) -> AppError
where
    F: FnOnce() -> AppError,
{
    match &error {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => on_violation(),
        _ => AppError::Database(error),
    }
}

/// Author persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn create(&self, name: &str) -> AppResult<Author>;

    /// All authors in insertion order
    async fn list(&self) -> AppResult<Vec<Author>>;

    async fn get_by_id(&self, id: i32) -> AppResult<Author>;

    async fn update(&self, id: i32, name: &str) -> AppResult<Author>;

    /// Fails with `Conflict` while books still reference the author
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Book persistence, always returned with the referenced author's name
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Fails with `UnprocessableEntity` if `author_id` does not exist
    async fn create(&self, title: &str, author_id: i32) -> AppResult<BookDetails>;

    /// All books in insertion order
    async fn list(&self) -> AppResult<Vec<BookDetails>>;

    async fn get_by_id(&self, id: i32) -> AppResult<BookDetails>;

    async fn update(&self, id: i32, title: &str, author_id: i32) -> AppResult<BookDetails>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Store connectivity probe used by the readiness check
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl StoreHealth for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
