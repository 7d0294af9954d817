//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
};

use super::{is_foreign_key_violation, is_unique_violation};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all books
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, isbn, total_copies, available_copies FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT id, title, author, isbn, total_copies, available_copies FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Create a new book. Available copies start equal to total copies.
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, title, author, isbn, total_copies, available_copies
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.total_copies)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("A book with this ISBN already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })
    }

    /// Update a book. A total-copy change shifts available copies by the same
    /// delta, clamped into [0, total]; the whole re-derivation happens in one
    /// statement so concurrent loan traffic cannot observe a partial update.
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                isbn = COALESCE($4, isbn),
                available_copies = LEAST(
                    COALESCE($5, total_copies),
                    GREATEST(0, available_copies + (COALESCE($5, total_copies) - total_copies))
                ),
                total_copies = COALESCE($5, total_copies)
            WHERE id = $1
            RETURNING id, title, author, isbn, total_copies, available_copies
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.total_copies)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("A book with this ISBN already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book. Refused while an active loan references it; the guard
    /// sits in the DELETE itself so a concurrent issue cannot slip between
    /// check and delete.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.get_by_id(id).await?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM loans WHERE loans.book_id = $1 AND loans.return_date IS NULL
              )
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::Conflict("Cannot delete book: loan records reference it".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "Cannot delete book: there are active loans associated with it".to_string(),
            ));
        }

        Ok(())
    }
}
