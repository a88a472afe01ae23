//! Books repository
//!
//! Reads join `authors` to produce the denormalized `author_name`; writes
//! look the author up by key inside the same session.

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};

use super::{map_foreign_key, open_session, BookStore};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookDetails},
};

const SELECT_DETAILS: &str = r#"
    SELECT b.id, b.title, b.author_id, a.name AS author_name
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}

fn missing_author(author_id: i32) -> AppError {
    AppError::UnprocessableEntity(format!("Author {} does not exist", author_id))
}

/// Fetch the author's name, holding a share lock until the session ends
async fn author_name_for_share(conn: &mut PgConnection, author_id: i32) -> AppResult<String> {
    sqlx::query_scalar::<_, String>("SELECT name FROM authors WHERE id = $1 FOR SHARE")
        .bind(author_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| {
            tracing::warn!(author_id, "Book references a missing author");
            missing_author(author_id)
        })
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn create(&self, title: &str, author_id: i32) -> AppResult<BookDetails> {
        let mut session = open_session(&self.pool).await?;

        let author_name = author_name_for_share(&mut session, author_id).await?;

        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, author_id) VALUES ($1, $2) RETURNING id, title, author_id",
        )
        .bind(title)
        .bind(author_id)
        .fetch_one(&mut *session)
        .await
        .map_err(|e| map_foreign_key(e, || missing_author(author_id)))?;

        session.commit().await?;
        Ok(book.with_author_name(author_name))
    }

    async fn list(&self) -> AppResult<Vec<BookDetails>> {
        let mut session = open_session(&self.pool).await?;
        let rows = sqlx::query_as::<_, BookDetails>(&format!("{} ORDER BY b.id", SELECT_DETAILS))
            .fetch_all(&mut *session)
            .await?;
        session.commit().await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<BookDetails> {
        let mut session = open_session(&self.pool).await?;
        let book =
            sqlx::query_as::<_, BookDetails>(&format!("{} WHERE b.id = $1", SELECT_DETAILS))
                .bind(id)
                .fetch_optional(&mut *session)
                .await?
                .ok_or_else(|| not_found(id))?;
        session.commit().await?;
        Ok(book)
    }

    async fn update(&self, id: i32, title: &str, author_id: i32) -> AppResult<BookDetails> {
        let mut session = open_session(&self.pool).await?;

        // Missing book is reported before a missing author
        sqlx::query_scalar::<_, i32>("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *session)
            .await?
            .ok_or_else(|| not_found(id))?;

        let author_name = author_name_for_share(&mut session, author_id).await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET title = $1, author_id = $2
            WHERE id = $3
            RETURNING id, title, author_id
            "#,
        )
        .bind(title)
        .bind(author_id)
        .bind(id)
        .fetch_one(&mut *session)
        .await
        .map_err(|e| map_foreign_key(e, || missing_author(author_id)))?;

        session.commit().await?;
        Ok(book.with_author_name(author_name))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut session = open_session(&self.pool).await?;
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *session)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        session.commit().await?;
        Ok(())
    }
}
