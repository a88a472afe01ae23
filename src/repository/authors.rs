//! Authors repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{map_foreign_key, open_session, AuthorStore};
use crate::{
    error::{AppError, AppResult},
    models::Author,
};

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Author {} not found", id))
}

fn still_referenced(id: i32, books: i64) -> AppError {
    AppError::Conflict(format!(
        "Author {} is still referenced by {} book(s)",
        id, books
    ))
}

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorStore for AuthorsRepository {
    async fn create(&self, name: &str) -> AppResult<Author> {
        let mut session = open_session(&self.pool).await?;
        let author = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&mut *session)
        .await?;
        session.commit().await?;
        Ok(author)
    }

    async fn list(&self) -> AppResult<Vec<Author>> {
        let mut session = open_session(&self.pool).await?;
        let rows = sqlx::query_as::<_, Author>("SELECT id, name FROM authors ORDER BY id")
            .fetch_all(&mut *session)
            .await?;
        session.commit().await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        let mut session = open_session(&self.pool).await?;
        let author = sqlx::query_as::<_, Author>("SELECT id, name FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *session)
            .await?
            .ok_or_else(|| not_found(id))?;
        session.commit().await?;
        Ok(author)
    }

    async fn update(&self, id: i32, name: &str) -> AppResult<Author> {
        let mut session = open_session(&self.pool).await?;
        let author = sqlx::query_as::<_, Author>(
            "UPDATE authors SET name = $1 WHERE id = $2 RETURNING id, name",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&mut *session)
        .await?
        .ok_or_else(|| not_found(id))?;
        session.commit().await?;
        Ok(author)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut session = open_session(&self.pool).await?;

        // Row lock conflicts with the FOR SHARE taken by book writes
        sqlx::query_scalar::<_, i32>("SELECT id FROM authors WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *session)
            .await?
            .ok_or_else(|| not_found(id))?;

        let books: i64 =
            sqlx::query_scalar("SELECT COUNT(*)::bigint FROM books WHERE author_id = $1")
                .bind(id)
                .fetch_one(&mut *session)
                .await?;
        if books > 0 {
            tracing::warn!(author_id = id, books, "Refusing to delete referenced author");
            return Err(still_referenced(id, books));
        }

        sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&mut *session)
            .await
            .map_err(|e| map_foreign_key(e, || still_referenced(id, 1)))?;

        session.commit().await?;
        Ok(())
    }
}
