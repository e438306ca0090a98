//! Repository Module
//!
//! Typed read access to the SurrealDB tables, plus the generic record
//! store the mutation engine writes through.

pub mod account;
pub mod consumable;
pub mod consumption;
pub mod equipment;
pub mod loan;
pub mod maintenance;
pub mod receipt;
pub mod record;

pub use account::AccountRepository;
pub use consumable::ConsumableRepository;
pub use consumption::ConsumptionRepository;
pub use equipment::EquipmentRepository;
pub use loan::LoanRepository;
pub use maintenance::MaintenanceRepository;
pub use receipt::ReceiptRepository;
pub use record::RecordStore;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for shared::error::AppError {
    fn from(err: RepoError) -> Self {
        use shared::error::AppError;
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
///
/// ID convention: the whole stack uses `table:id` strings at the API
/// boundary, parsed into `surrealdb::RecordId` for CRUD calls.
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse a `table:id` (or bare key) string into a RecordId for `table`,
/// rejecting ids that point at a different table.
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<surrealdb::RecordId> {
    if let Ok(rid) = id.parse::<surrealdb::RecordId>() {
        if rid.table() == table {
            return Ok(rid);
        }
        if id.contains(':') {
            return Err(RepoError::Validation(format!(
                "ID '{id}' does not belong to table '{table}'"
            )));
        }
    }
    // Bare key: numeric keys parse as i64 so generated and parsed ids match
    if let Ok(n) = id.parse::<i64>() {
        return Ok(surrealdb::RecordId::from_table_key(table, n));
    }
    Ok(surrealdb::RecordId::from_table_key(table, id))
}
