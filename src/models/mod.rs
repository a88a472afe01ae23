//! Data models for Bookshelf

pub mod author;
pub mod book;

// Re-export commonly used types
pub use author::{Author, AuthorPayload};
pub use book::{Book, BookDetails, BookPayload};
