//! Equipment Model

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Equipment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    InService,
    OnLoan,
    UnderMaintenance,
    Retired,
}

/// Equipment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Inventory sticker number, unique per unit
    pub asset_tag: String,
    pub name: String,
    pub model: Option<String>,
    pub serial_no: Option<String>,
    pub location: Option<String>,
    pub status: EquipmentStatus,
    /// Purchase date (ISO `YYYY-MM-DD`)
    pub purchased_at: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub note: Option<String>,
}

/// Create equipment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentCreate {
    pub asset_tag: String,
    pub name: String,
    pub model: Option<String>,
    pub serial_no: Option<String>,
    pub location: Option<String>,
    #[serde(default = "default_status")]
    pub status: EquipmentStatus,
    pub purchased_at: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub note: Option<String>,
}

fn default_status() -> EquipmentStatus {
    EquipmentStatus::InService
}

/// Update equipment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EquipmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchased_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Equipment {
    /// Build the post-update state of this equipment unit
    pub fn from_create(create: EquipmentCreate) -> Equipment {
        Equipment {
            id: None,
            asset_tag: create.asset_tag,
            name: create.name,
            model: create.model,
            serial_no: create.serial_no,
            location: create.location,
            status: create.status,
            purchased_at: create.purchased_at,
            purchase_price: create.purchase_price,
            note: create.note,
        }
    }

    pub fn apply_update(&self, update: EquipmentUpdate) -> Equipment {
        Equipment {
            id: self.id.clone(),
            asset_tag: update.asset_tag.unwrap_or_else(|| self.asset_tag.clone()),
            name: update.name.unwrap_or_else(|| self.name.clone()),
            model: update.model.or_else(|| self.model.clone()),
            serial_no: update.serial_no.or_else(|| self.serial_no.clone()),
            location: update.location.or_else(|| self.location.clone()),
            status: update.status.unwrap_or(self.status),
            purchased_at: update.purchased_at.or_else(|| self.purchased_at.clone()),
            purchase_price: update.purchase_price.or(self.purchase_price),
            note: update.note.or_else(|| self.note.clone()),
        }
    }
}
