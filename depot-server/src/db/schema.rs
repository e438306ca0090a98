//! Schema bootstrap
//!
//! Idempotent `DEFINE` statements executed at startup. Tables stay
//! schemaless; only the uniqueness constraints the application relies on
//! are declared.

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const DEFINITIONS: &[&str] = &[
    // Accounts
    "DEFINE TABLE IF NOT EXISTS account SCHEMALESS",
    "DEFINE INDEX IF NOT EXISTS account_username ON account FIELDS username UNIQUE",
    // Business records
    "DEFINE TABLE IF NOT EXISTS equipment SCHEMALESS",
    "DEFINE INDEX IF NOT EXISTS equipment_asset_tag ON equipment FIELDS asset_tag UNIQUE",
    "DEFINE TABLE IF NOT EXISTS consumable SCHEMALESS",
    // The running stock counter exists from the moment a SKU is created
    "DEFINE FIELD IF NOT EXISTS stock_quantity ON consumable TYPE int DEFAULT 0",
    "DEFINE TABLE IF NOT EXISTS receipt SCHEMALESS",
    "DEFINE TABLE IF NOT EXISTS consumption SCHEMALESS",
    "DEFINE TABLE IF NOT EXISTS maintenance SCHEMALESS",
    "DEFINE TABLE IF NOT EXISTS loan SCHEMALESS",
    // Audit log: append-only; the application exposes no update/delete path
    "DEFINE TABLE IF NOT EXISTS audit_log SCHEMALESS",
    "DEFINE INDEX IF NOT EXISTS audit_log_sequence ON audit_log FIELDS sequence UNIQUE",
];

/// Apply all schema definitions
pub async fn apply(db: &Surreal<Db>) -> Result<(), AppError> {
    for stmt in DEFINITIONS {
        db.query(*stmt)
            .await
            .map_err(|e| AppError::database(format!("Schema definition failed: {e}")))?;
    }
    Ok(())
}
