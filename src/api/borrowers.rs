//! Borrower endpoints. Mutations are admin-only; reads need any
//! authenticated role.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::borrower::{Borrower, CreateBorrower, UpdateBorrower},
};

use super::AuthenticatedUser;

/// List all borrowers
#[utoipa::path(
    get,
    path = "/borrowers",
    tag = "borrowers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of borrowers", body = Vec<Borrower>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_borrowers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Borrower>>> {
    let borrowers = state.services.borrowers.list_borrowers().await?;
    Ok(Json(borrowers))
}

/// Get a single borrower by ID
#[utoipa::path(
    get,
    path = "/borrowers/{id}",
    tag = "borrowers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrower ID")
    ),
    responses(
        (status = 200, description = "Borrower details", body = Borrower),
        (status = 404, description = "Borrower not found")
    )
)]
pub async fn get_borrower(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Borrower>> {
    let borrower = state.services.borrowers.get_borrower(id).await?;
    Ok(Json(borrower))
}

/// Add a new borrower (admin only)
#[utoipa::path(
    post,
    path = "/borrowers",
    tag = "borrowers",
    security(("bearer_auth" = [])),
    request_body = CreateBorrower,
    responses(
        (status = 201, description = "Borrower created", body = Borrower),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn create_borrower(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(borrower): Json<CreateBorrower>,
) -> AppResult<(StatusCode, Json<Borrower>)> {
    claims.require_admin()?;
    borrower.validate()?;

    let created = state.services.borrowers.create_borrower(borrower).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a borrower (admin only)
#[utoipa::path(
    put,
    path = "/borrowers/{id}",
    tag = "borrowers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrower ID")
    ),
    request_body = UpdateBorrower,
    responses(
        (status = 204, description = "Borrower updated"),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Borrower not found")
    )
)]
pub async fn update_borrower(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(borrower): Json<UpdateBorrower>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    borrower.validate()?;

    state.services.borrowers.update_borrower(id, borrower).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a borrower (admin only). Refused while active loans reference
/// them.
#[utoipa::path(
    delete,
    path = "/borrowers/{id}",
    tag = "borrowers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrower ID")
    ),
    responses(
        (status = 204, description = "Borrower deleted"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Borrower not found"),
        (status = 409, description = "Active loans reference this borrower")
    )
)]
pub async fn delete_borrower(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.borrowers.delete_borrower(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
