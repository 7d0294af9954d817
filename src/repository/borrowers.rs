//! Borrowers repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::borrower::{Borrower, CreateBorrower, UpdateBorrower},
};

use super::is_foreign_key_violation;

#[derive(Clone)]
pub struct BorrowersRepository {
    pool: Pool<Postgres>,
}

impl BorrowersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all borrowers
    pub async fn list(&self) -> AppResult<Vec<Borrower>> {
        let borrowers = sqlx::query_as::<_, Borrower>(
            "SELECT id, name, email, phone FROM borrowers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(borrowers)
    }

    /// Get borrower by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrower> {
        sqlx::query_as::<_, Borrower>("SELECT id, name, email, phone FROM borrowers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrower with id {} not found", id)))
    }

    /// Create a new borrower
    pub async fn create(&self, borrower: &CreateBorrower) -> AppResult<Borrower> {
        let created = sqlx::query_as::<_, Borrower>(
            r#"
            INSERT INTO borrowers (name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, phone
            "#,
        )
        .bind(&borrower.name)
        .bind(&borrower.email)
        .bind(&borrower.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a borrower (partial)
    pub async fn update(&self, id: i32, borrower: &UpdateBorrower) -> AppResult<Borrower> {
        sqlx::query_as::<_, Borrower>(
            r#"
            UPDATE borrowers SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone)
            WHERE id = $1
            RETURNING id, name, email, phone
            "#,
        )
        .bind(id)
        .bind(&borrower.name)
        .bind(&borrower.email)
        .bind(&borrower.phone)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrower with id {} not found", id)))
    }

    /// Delete a borrower. Refused while an active loan references them.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.get_by_id(id).await?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM borrowers
            WHERE id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM loans WHERE loans.borrower_id = $1 AND loans.return_date IS NULL
              )
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::Conflict(
                    "Cannot delete borrower: loan records reference them".to_string(),
                )
            } else {
                AppError::Database(e)
            }
        })?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "Cannot delete borrower: there are active loans associated with them".to_string(),
            ));
        }

        Ok(())
    }
}
