//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book row as stored
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
}

impl Book {
    /// Pair the stored row with the current name of its author
    pub fn with_author_name(self, author_name: String) -> BookDetails {
        BookDetails {
            id: self.id,
            title: self.title,
            author_id: self.author_id,
            author_name,
        }
    }
}

/// Book with its author's name, joined at read time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    /// Current name of the referenced author (not stored on the book)
    pub author_name: String,
}

/// Create or update book request
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct BookPayload {
    #[validate(length(min = 1, message = "Book title cannot be empty"))]
    pub title: String,
    pub author_id: i32,
}
