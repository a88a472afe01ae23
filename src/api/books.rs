//! Book API endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{BookDetails, BookPayload},
    AppState,
};

use super::{AppJson, MessageResponse};

/// Create a book
#[utoipa::path(
    post,
    path = "/books/",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book created", body = BookDetails),
        (status = 400, description = "Invalid book", body = crate::error::ErrorResponse),
        (status = 422, description = "Referenced author does not exist", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AppJson(data): AppJson<BookPayload>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.books.create(&data).await?;
    Ok(Json(book))
}

/// List all books with their author names
#[utoipa::path(
    get,
    path = "/books/",
    tag = "books",
    responses(
        (status = 200, description = "Book list", body = Vec<BookDetails>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookDetails>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(Json(book))
}

/// Replace a book's title and author
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = BookDetails),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Referenced author does not exist", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(data): AppJson<BookPayload>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.books.update(id, &data).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete(id).await?;
    Ok(Json(MessageResponse::new("Book deleted")))
}
