//! Consumption Model
//!
//! A consumption slip records consumables leaving stock (issued to a
//! department or person). Its line items drive the inventory ledger with a
//! negative direction.

use super::line_item::LineItem;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Consumption slip entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consumption {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub department: String,
    pub issued_to: String,
    /// Issue date (ISO `YYYY-MM-DD`)
    pub issued_at: String,
    pub items: Vec<LineItem>,
    pub note: Option<String>,
}

/// Create consumption payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionCreate {
    pub department: String,
    pub issued_to: String,
    pub issued_at: String,
    pub items: Vec<LineItem>,
    pub note: Option<String>,
}

/// Update consumption payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Consumption {
    pub fn from_create(create: ConsumptionCreate) -> Consumption {
        Consumption {
            id: None,
            department: create.department,
            issued_to: create.issued_to,
            issued_at: create.issued_at,
            items: create.items,
            note: create.note,
        }
    }

    /// Build the post-update state of this consumption slip
    pub fn apply_update(&self, update: ConsumptionUpdate) -> Consumption {
        Consumption {
            id: self.id.clone(),
            department: update.department.unwrap_or_else(|| self.department.clone()),
            issued_to: update.issued_to.unwrap_or_else(|| self.issued_to.clone()),
            issued_at: update.issued_at.unwrap_or_else(|| self.issued_at.clone()),
            items: update.items.unwrap_or_else(|| self.items.clone()),
            note: update.note.or_else(|| self.note.clone()),
        }
    }
}
