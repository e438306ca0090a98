//! Loan Model (borrow/return cycle for equipment)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Out,
    Returned,
}

/// Loan entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// `equipment:id` of the borrowed unit
    pub equipment: String,
    pub borrower: String,
    /// Borrow date (ISO `YYYY-MM-DD`)
    pub borrowed_at: String,
    pub due_at: Option<String>,
    pub returned_at: Option<String>,
    pub status: LoanStatus,
    pub note: Option<String>,
}

/// Create loan payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanCreate {
    pub equipment: String,
    pub borrower: String,
    pub borrowed_at: String,
    pub due_at: Option<String>,
    pub note: Option<String>,
}

/// Update loan payload (also used to record the return)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LoanStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Loan {
    pub fn from_create(create: LoanCreate) -> Loan {
        Loan {
            id: None,
            equipment: create.equipment,
            borrower: create.borrower,
            borrowed_at: create.borrowed_at,
            due_at: create.due_at,
            returned_at: None,
            status: LoanStatus::Out,
            note: create.note,
        }
    }

    /// Build the post-update state of this loan
    pub fn apply_update(&self, update: LoanUpdate) -> Loan {
        Loan {
            id: self.id.clone(),
            equipment: self.equipment.clone(),
            borrower: update.borrower.unwrap_or_else(|| self.borrower.clone()),
            borrowed_at: self.borrowed_at.clone(),
            due_at: update.due_at.or_else(|| self.due_at.clone()),
            returned_at: update.returned_at.or_else(|| self.returned_at.clone()),
            status: update.status.unwrap_or(self.status),
            note: update.note.or_else(|| self.note.clone()),
        }
    }
}
