//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Author record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
}

/// Create or update author request
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct AuthorPayload {
    #[validate(length(min = 1, message = "Author name cannot be empty"))]
    pub name: String,
}
