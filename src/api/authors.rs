//! Author API endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{Author, AuthorPayload},
    AppState,
};

use super::{AppJson, MessageResponse};

/// Create an author
#[utoipa::path(
    post,
    path = "/authors/",
    tag = "authors",
    request_body = AuthorPayload,
    responses(
        (status = 200, description = "Author created", body = Author),
        (status = 400, description = "Invalid author", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AppJson(data): AppJson<AuthorPayload>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.create(&data).await?;
    Ok(Json(author))
}

/// List all authors
#[utoipa::path(
    get,
    path = "/authors/",
    tag = "authors",
    responses(
        (status = 200, description = "Author list", body = Vec<Author>)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(authors))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.get_by_id(id).await?;
    Ok(Json(author))
}

/// Rename an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorPayload,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(data): AppJson<AuthorPayload>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.update(id, &data).await?;
    Ok(Json(author))
}

/// Delete an author that no book references
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author deleted", body = MessageResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Author still referenced by books", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.authors.delete(id).await?;
    Ok(Json(MessageResponse::new("Author deleted")))
}
