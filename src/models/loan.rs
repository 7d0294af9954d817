//! Loan model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Loan model from database.
///
/// A loan is created by issue, mutated exactly once by return (setting
/// return_date) and never deleted. is_returned/is_overdue are computed from
/// the dates rather than stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: i32,
    pub book_id: i32,
    pub borrower_id: i32,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_returned(&self) -> bool {
        self.return_date.is_some()
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.return_date.is_none() && self.due_date < now
    }
}

/// Loan with book and borrower names for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanView {
    pub id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub borrower_id: i32,
    pub borrower_name: String,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub is_overdue: bool,
}

fn default_loan_duration() -> i32 {
    14
}

/// Issue loan request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct IssueLoan {
    #[validate(range(min = 1, message = "book_id must be a positive integer"))]
    pub book_id: i32,
    #[validate(range(min = 1, message = "borrower_id must be a positive integer"))]
    pub borrower_id: i32,
    #[validate(range(min = 1, max = 365, message = "loan_duration_days must be between 1 and 365"))]
    #[serde(default = "default_loan_duration")]
    pub loan_duration_days: i32,
}

/// Return loan request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReturnLoan {
    #[validate(range(min = 1, message = "loan_id must be a positive integer"))]
    pub loan_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn loan(due_offset: i64, returned: bool) -> Loan {
        let now = Utc::now();
        Loan {
            id: 1,
            book_id: 1,
            borrower_id: 1,
            loan_date: now - Duration::days(10),
            due_date: now + Duration::days(due_offset),
            return_date: returned.then_some(now),
        }
    }

    #[test]
    fn active_loan_past_due_is_overdue() {
        let now = Utc::now();
        assert!(loan(-1, false).is_overdue(now));
        assert!(!loan(1, false).is_overdue(now));
    }

    #[test]
    fn returned_loan_is_never_overdue() {
        let now = Utc::now();
        let l = loan(-5, true);
        assert!(l.is_returned());
        assert!(!l.is_overdue(now));
    }

    #[test]
    fn issue_request_defaults_to_fourteen_days() {
        let req: IssueLoan = serde_json::from_str(r#"{"book_id": 1, "borrower_id": 2}"#).unwrap();
        assert_eq!(req.loan_duration_days, 14);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn issue_request_rejects_out_of_range_duration() {
        let req: IssueLoan =
            serde_json::from_str(r#"{"book_id": 1, "borrower_id": 2, "loan_duration_days": 366}"#)
                .unwrap();
        assert!(req.validate().is_err());

        let req: IssueLoan =
            serde_json::from_str(r#"{"book_id": 1, "borrower_id": 2, "loan_duration_days": 0}"#)
                .unwrap();
        assert!(req.validate().is_err());
    }
}
