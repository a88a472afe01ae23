//! Business logic services

pub mod authors;
pub mod books;

use std::sync::Arc;

use crate::repository::{AuthorStore, BookStore, Repository, StoreHealth};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub health: Arc<dyn StoreHealth>,
}

impl Services {
    /// Create all services backed by the Postgres repository
    pub fn new(repository: Repository) -> Self {
        Self::from_stores(
            Arc::new(repository.authors.clone()),
            Arc::new(repository.books.clone()),
            Arc::new(repository),
        )
    }

    /// Create all services over arbitrary store implementations
    pub fn from_stores(
        authors: Arc<dyn AuthorStore>,
        books: Arc<dyn BookStore>,
        health: Arc<dyn StoreHealth>,
    ) -> Self {
        Self {
            authors: authors::AuthorsService::new(authors),
            books: books::BooksService::new(books),
            health,
        }
    }
}
