//! Loan endpoints.
//!
//! Issue and return are open to any authenticated role; only catalog and
//! borrower mutations are admin-gated.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::loan::{IssueLoan, LoanView, ReturnLoan},
};

use super::AuthenticatedUser;

/// Issue a loan for a book to a borrower
#[utoipa::path(
    post,
    path = "/loans/issue",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = IssueLoan,
    responses(
        (status = 201, description = "Loan issued", body = LoanView),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Book or borrower not found"),
        (status = 409, description = "No copies available"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn issue_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<IssueLoan>,
) -> AppResult<(StatusCode, Json<LoanView>)> {
    request.validate()?;

    let loan = state.services.loans.issue_loan(&request).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/returns",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = ReturnLoan,
    responses(
        (status = 204, description = "Book returned"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<ReturnLoan>,
) -> AppResult<StatusCode> {
    request.validate()?;

    state.services.loans.return_loan(request.loan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a single loan by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan details", body = LoanView),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<LoanView>> {
    let loan = state.services.loans.get_loan(id).await?;
    Ok(Json(loan))
}

/// List all currently overdue loans
#[utoipa::path(
    get,
    path = "/loans/overdue",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Overdue loans", body = Vec<LoanView>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn overdue_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanView>>> {
    let loans = state.services.loans.overdue_loans().await?;
    Ok(Json(loans))
}
