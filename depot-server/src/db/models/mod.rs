//! Database Models
//!
//! Serde models matching the SurrealDB tables, plus the create/update
//! payloads the API accepts for each of them.

pub mod serde_helpers;

pub mod account;
pub mod consumable;
pub mod consumption;
pub mod equipment;
pub mod line_item;
pub mod loan;
pub mod maintenance;
pub mod receipt;

pub use account::{Account, AccountCreate, AccountRole, AccountUpdate};
pub use consumable::{Consumable, ConsumableCreate, ConsumableUpdate};
pub use consumption::{Consumption, ConsumptionCreate, ConsumptionUpdate};
pub use equipment::{Equipment, EquipmentCreate, EquipmentStatus, EquipmentUpdate};
pub use line_item::{LineItem, Part};
pub use loan::{Loan, LoanCreate, LoanStatus, LoanUpdate};
pub use maintenance::{Maintenance, MaintenanceCreate, MaintenanceStatus, MaintenanceUpdate};
pub use receipt::{Receipt, ReceiptCreate, ReceiptUpdate};
