//! Loan management service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::loan::{IssueLoan, LoanView},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Issue a loan for a book to a borrower.
    ///
    /// Preconditions are checked in order: book exists, copies available,
    /// borrower exists. The availability check here is advisory for a clean
    /// error; the authoritative re-check happens inside the repository
    /// transaction, which alone decides races over the last copy.
    pub async fn issue_loan(&self, request: &IssueLoan) -> AppResult<LoanView> {
        let book = self.repository.books.get_by_id(request.book_id).await?;

        if book.available_copies <= 0 {
            return Err(AppError::Conflict(format!(
                "Book '{}' has no available copies for loan",
                book.title
            )));
        }

        let borrower = self
            .repository
            .borrowers
            .get_by_id(request.borrower_id)
            .await?;

        let loan = self
            .repository
            .loans
            .issue(book.id, borrower.id, request.loan_duration_days)
            .await?;

        Ok(LoanView {
            id: loan.id,
            book_id: loan.book_id,
            book_title: book.title,
            borrower_id: loan.borrower_id,
            borrower_name: borrower.name,
            loan_date: loan.loan_date,
            due_date: loan.due_date,
            return_date: loan.return_date,
            is_overdue: loan.is_overdue(Utc::now()),
        })
    }

    /// Return a borrowed book
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<()> {
        self.repository.loans.return_loan(loan_id).await
    }

    /// Get a single loan with display details
    pub async fn get_loan(&self, loan_id: i32) -> AppResult<LoanView> {
        self.repository.loans.get_view(loan_id).await
    }

    /// List all currently overdue loans
    pub async fn overdue_loans(&self) -> AppResult<Vec<LoanView>> {
        self.repository.loans.overdue().await
    }
}
