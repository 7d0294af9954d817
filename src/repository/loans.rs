//! Loans repository for database operations.
//!
//! Issue and return each run inside a single transaction with conditional
//! updates against the book's copy counter, so the availability invariant
//! (0 <= available_copies <= total_copies, one active loan per lent copy)
//! holds under concurrent requests without any in-process locking.

use chrono::{DateTime, Duration, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanView},
};

const LOAN_COLUMNS: &str = "id, book_id, borrower_id, loan_date, due_date, return_date";

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(&format!("SELECT {} FROM loans WHERE id = $1", LOAN_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Get loan by ID with book title and borrower name
    pub async fn get_view(&self, id: i32) -> AppResult<LoanView> {
        let row = sqlx::query(
            r#"
            SELECT l.id, l.book_id, l.borrower_id, l.loan_date, l.due_date, l.return_date,
                   b.title AS book_title, br.name AS borrower_name
            FROM loans l
            JOIN books b ON l.book_id = b.id
            JOIN borrowers br ON l.borrower_id = br.id
            WHERE l.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        Ok(view_from_row(&row, Utc::now()))
    }

    /// Issue a loan: decrement the book's available copies and insert the
    /// loan as one atomic unit.
    ///
    /// The decrement is conditioned on `available_copies > 0` and re-checked
    /// by the database at commit time; when two issues race over the last
    /// copy, one update affects zero rows and the whole transaction rolls
    /// back with a conflict. No partial state (loan without decrement or
    /// decrement without loan) is ever visible.
    pub async fn issue(
        &self,
        book_id: i32,
        borrower_id: i32,
        duration_days: i32,
    ) -> AppResult<Loan> {
        let now = Utc::now();
        let due_date = now + Duration::days(duration_days as i64);

        let mut tx = self.pool.begin().await?;

        let decremented = sqlx::query(
            "UPDATE books SET available_copies = available_copies - 1 WHERE id = $1 AND available_copies > 0",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            // Dropping the transaction rolls it back.
            return Err(AppError::Conflict(
                "Book has no available copies for loan".to_string(),
            ));
        }

        let loan = sqlx::query_as::<_, Loan>(&format!(
            r#"
            INSERT INTO loans (book_id, borrower_id, loan_date, due_date, return_date)
            VALUES ($1, $2, $3, $4, NULL)
            RETURNING {}
            "#,
            LOAN_COLUMNS
        ))
        .bind(book_id)
        .bind(borrower_id)
        .bind(now)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(loan)
    }

    /// Return a loan: set the return date and increment the book's available
    /// copies as one atomic unit. Returned is terminal.
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<()> {
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>(&format!(
            "SELECT {} FROM loans WHERE id = $1",
            LOAN_COLUMNS
        ))
        .bind(loan_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", loan_id)))?;

        // The NULL condition makes a concurrent double return lose: the
        // second update affects zero rows once the first commits.
        let marked = sqlx::query(
            "UPDATE loans SET return_date = $1 WHERE id = $2 AND return_date IS NULL",
        )
        .bind(now)
        .bind(loan_id)
        .execute(&mut *tx)
        .await?;

        if marked.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "This loan has already been returned".to_string(),
            ));
        }

        // Zero rows here means the book row is gone or the increment would
        // push available past total; either way an invariant broke upstream.
        let incremented = sqlx::query(
            "UPDATE books SET available_copies = available_copies + 1 WHERE id = $1 AND available_copies < total_copies",
        )
        .bind(loan.book_id)
        .execute(&mut *tx)
        .await?;

        if incremented.rows_affected() == 0 {
            return Err(AppError::Inconsistency(format!(
                "returning loan {} would push available copies of book {} past total",
                loan_id, loan.book_id
            )));
        }

        tx.commit().await?;

        Ok(())
    }

    /// List overdue loans: active and past due, ordered by due date.
    pub async fn overdue(&self) -> AppResult<Vec<LoanView>> {
        let now = Utc::now();

        let rows = sqlx::query(
            r#"
            SELECT l.id, l.book_id, l.borrower_id, l.loan_date, l.due_date, l.return_date,
                   b.title AS book_title, br.name AS borrower_name
            FROM loans l
            JOIN books b ON l.book_id = b.id
            JOIN borrowers br ON l.borrower_id = br.id
            WHERE l.return_date IS NULL AND l.due_date < $1
            ORDER BY l.due_date, l.id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| view_from_row(row, now)).collect())
    }
}

fn view_from_row(row: &sqlx::postgres::PgRow, now: DateTime<Utc>) -> LoanView {
    let due_date: DateTime<Utc> = row.get("due_date");
    let return_date: Option<DateTime<Utc>> = row.get("return_date");

    LoanView {
        id: row.get("id"),
        book_id: row.get("book_id"),
        book_title: row.get("book_title"),
        borrower_id: row.get("borrower_id"),
        borrower_name: row.get("borrower_name"),
        loan_date: row.get("loan_date"),
        due_date,
        return_date,
        is_overdue: return_date.is_none() && due_date < now,
    }
}
