//! Authors service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorPayload},
    repository::AuthorStore,
};

fn checked_name(data: &AuthorPayload) -> AppResult<&str> {
    data.validate()?;
    let name = data.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Author name cannot be empty".to_string()));
    }
    Ok(name)
}

#[derive(Clone)]
pub struct AuthorsService {
    store: Arc<dyn AuthorStore>,
}

impl AuthorsService {
    pub fn new(store: Arc<dyn AuthorStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, data: &AuthorPayload) -> AppResult<Author> {
        let name = checked_name(data)?;
        let author = self.store.create(name).await?;
        tracing::info!(author_id = author.id, "Author created");
        Ok(author)
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.store.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        self.store.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, data: &AuthorPayload) -> AppResult<Author> {
        let name = checked_name(data)?;
        let author = self.store.update(id, name).await?;
        tracing::info!(author_id = id, "Author updated");
        Ok(author)
    }

    /// Delete an author (refused while books reference it)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.store.delete(id).await?;
        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }
}
