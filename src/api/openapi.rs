//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library CRUD API",
        version = "1.0.0",
        description = "Author and book record management REST API"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Authors
        authors::create_author,
        authors::list_authors,
        authors::get_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::create_book,
        books::list_books,
        books::get_book,
        books::update_book,
        books::delete_book,
    ),
    components(
        schemas(
            crate::models::author::Author,
            crate::models::author::AuthorPayload,
            crate::models::book::BookDetails,
            crate::models::book::BookPayload,
            crate::api::MessageResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
