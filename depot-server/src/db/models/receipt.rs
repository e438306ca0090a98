//! Receipt Model
//!
//! A receipt records consumables entering stock. Its line items drive the
//! inventory ledger with a positive direction.

use super::line_item::LineItem;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Receipt entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub receipt_no: String,
    pub supplier: String,
    /// Receiving date (ISO `YYYY-MM-DD`)
    pub received_at: String,
    pub items: Vec<LineItem>,
    pub note: Option<String>,
}

/// Create receipt payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptCreate {
    pub receipt_no: String,
    pub supplier: String,
    pub received_at: String,
    pub items: Vec<LineItem>,
    pub note: Option<String>,
}

/// Update receipt payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Receipt {
    pub fn from_create(create: ReceiptCreate) -> Receipt {
        Receipt {
            id: None,
            receipt_no: create.receipt_no,
            supplier: create.supplier,
            received_at: create.received_at,
            items: create.items,
            note: create.note,
        }
    }

    /// Build the post-update state of this receipt
    pub fn apply_update(&self, update: ReceiptUpdate) -> Receipt {
        Receipt {
            id: self.id.clone(),
            receipt_no: update.receipt_no.unwrap_or_else(|| self.receipt_no.clone()),
            supplier: update.supplier.unwrap_or_else(|| self.supplier.clone()),
            received_at: update.received_at.unwrap_or_else(|| self.received_at.clone()),
            items: update.items.unwrap_or_else(|| self.items.clone()),
            note: update.note.or_else(|| self.note.clone()),
        }
    }
}
