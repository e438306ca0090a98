//! Maintenance Ticket Model

use super::line_item::Part;
use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Maintenance ticket status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Open,
    InRepair,
    Completed,
}

/// Maintenance ticket entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maintenance {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// `equipment:id` of the unit under repair
    pub equipment: String,
    pub reported_by: String,
    pub fault_desc: String,
    pub status: MaintenanceStatus,
    #[serde(default)]
    pub parts_replaced: Vec<Part>,
    pub cost: Option<Decimal>,
    /// Completion date (ISO `YYYY-MM-DD`)
    pub completed_at: Option<String>,
}

/// Create maintenance payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceCreate {
    pub equipment: String,
    pub reported_by: String,
    pub fault_desc: String,
    #[serde(default = "default_status")]
    pub status: MaintenanceStatus,
    #[serde(default)]
    pub parts_replaced: Vec<Part>,
    pub cost: Option<Decimal>,
    pub completed_at: Option<String>,
}

fn default_status() -> MaintenanceStatus {
    MaintenanceStatus::Open
}

/// Update maintenance payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MaintenanceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts_replaced: Option<Vec<Part>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl Maintenance {
    pub fn from_create(create: MaintenanceCreate) -> Maintenance {
        Maintenance {
            id: None,
            equipment: create.equipment,
            reported_by: create.reported_by,
            fault_desc: create.fault_desc,
            status: create.status,
            parts_replaced: create.parts_replaced,
            cost: create.cost,
            completed_at: create.completed_at,
        }
    }

    /// Build the post-update state of this ticket
    pub fn apply_update(&self, update: MaintenanceUpdate) -> Maintenance {
        Maintenance {
            id: self.id.clone(),
            equipment: update.equipment.unwrap_or_else(|| self.equipment.clone()),
            reported_by: update.reported_by.unwrap_or_else(|| self.reported_by.clone()),
            fault_desc: update.fault_desc.unwrap_or_else(|| self.fault_desc.clone()),
            status: update.status.unwrap_or(self.status),
            parts_replaced: update
                .parts_replaced
                .unwrap_or_else(|| self.parts_replaced.clone()),
            cost: update.cost.or(self.cost),
            completed_at: update.completed_at.or_else(|| self.completed_at.clone()),
        }
    }
}
