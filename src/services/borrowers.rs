//! Borrowers service

use crate::{
    error::AppResult,
    models::borrower::{Borrower, CreateBorrower, UpdateBorrower},
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowersService {
    repository: Repository,
}

impl BorrowersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_borrowers(&self) -> AppResult<Vec<Borrower>> {
        self.repository.borrowers.list().await
    }

    pub async fn get_borrower(&self, id: i32) -> AppResult<Borrower> {
        self.repository.borrowers.get_by_id(id).await
    }

    pub async fn create_borrower(&self, borrower: CreateBorrower) -> AppResult<Borrower> {
        self.repository.borrowers.create(&borrower).await
    }

    pub async fn update_borrower(&self, id: i32, borrower: UpdateBorrower) -> AppResult<Borrower> {
        self.repository.borrowers.update(id, &borrower).await
    }

    pub async fn delete_borrower(&self, id: i32) -> AppResult<()> {
        self.repository.borrowers.delete(id).await
    }
}
