//! Book (catalog) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book model from database.
///
/// Invariant: 0 <= available_copies <= total_copies. available_copies only
/// moves through loan issue (-1), loan return (+1) and administrative
/// total-copy adjustment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: i32,
    pub available_copies: i32,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "Author must be between 1 and 100 characters"))]
    pub author: String,
    #[validate(length(min = 10, max = 17, message = "ISBN must be between 10 and 17 characters"))]
    pub isbn: String,
    #[validate(range(min = 1, message = "Total copies must be at least 1"))]
    pub total_copies: i32,
}

/// Update book request. All fields optional for partial updates.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Author must be between 1 and 100 characters"))]
    pub author: Option<String>,
    #[validate(length(min = 10, max = 17, message = "ISBN must be between 10 and 17 characters"))]
    pub isbn: Option<String>,
    #[validate(range(min = 0, message = "Total copies cannot be negative"))]
    pub total_copies: Option<i32>,
}
