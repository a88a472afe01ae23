//! Books service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{BookDetails, BookPayload},
    repository::BookStore,
};

fn checked_title(data: &BookPayload) -> AppResult<&str> {
    data.validate()?;
    let title = data.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Book title cannot be empty".to_string()));
    }
    Ok(title)
}

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Create a book for an existing author
    pub async fn create(&self, data: &BookPayload) -> AppResult<BookDetails> {
        let title = checked_title(data)?;
        let book = self.store.create(title, data.author_id).await?;
        tracing::info!(book_id = book.id, author_id = book.author_id, "Book created");
        Ok(book)
    }

    pub async fn list(&self) -> AppResult<Vec<BookDetails>> {
        self.store.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<BookDetails> {
        self.store.get_by_id(id).await
    }

    /// Replace title and author of a book
    pub async fn update(&self, id: i32, data: &BookPayload) -> AppResult<BookDetails> {
        let title = checked_title(data)?;
        let book = self.store.update(id, title, data.author_id).await?;
        tracing::info!(book_id = id, author_id = book.author_id, "Book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.store.delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }
}
