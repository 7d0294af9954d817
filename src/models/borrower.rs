//! Borrower model and related types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 .\-()]{5,18}$").expect("valid phone regex"));

/// Borrower model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrower {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Create borrower request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBorrower {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email cannot exceed 100 characters")
    )]
    pub email: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number format"))]
    pub phone: Option<String>,
}

/// Update borrower request. All fields optional for partial updates.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBorrower {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email cannot exceed 100 characters")
    )]
    pub email: Option<String>,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number format"))]
    pub phone: Option<String>,
}
