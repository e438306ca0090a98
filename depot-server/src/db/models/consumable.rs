//! Consumable Model
//!
//! A consumable is a stocked SKU (toner cartridge, ink bottle, paper box).
//! `stock_quantity` is the denormalized running counter maintained by the
//! inventory ledger; it is never edited directly through the API and may go
//! negative when issues outrun receipts.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Consumable entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consumable {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub model: Option<String>,
    /// Unit of measure shown on line items (pcs, box, bottle)
    pub unit: String,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub warn_threshold: i64,
}

/// Create consumable payload (stock starts at zero; receipts move it)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumableCreate {
    pub name: String,
    pub model: Option<String>,
    pub unit: String,
    #[serde(default)]
    pub warn_threshold: i64,
}

/// Update consumable payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warn_threshold: Option<i64>,
}

impl Consumable {
    /// Build the post-update state of this consumable
    pub fn apply_update(&self, update: ConsumableUpdate) -> Consumable {
        Consumable {
            id: self.id.clone(),
            name: update.name.unwrap_or_else(|| self.name.clone()),
            model: update.model.or_else(|| self.model.clone()),
            unit: update.unit.unwrap_or_else(|| self.unit.clone()),
            stock_quantity: self.stock_quantity,
            warn_threshold: update.warn_threshold.unwrap_or(self.warn_threshold),
        }
    }
}
