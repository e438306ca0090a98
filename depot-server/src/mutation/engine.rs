//! Mutation engine
//!
//! Single entry point for audit-logged record mutations. Each submission
//! runs as one sequential chain (reconcile stock where the record carries
//! line items, persist the record, diff the drafts, append the audit rows)
//! because later steps depend on earlier ones and compensation needs the
//! exact prior state.
//!
//! The audit append is attempted synchronously before success is reported.
//! If it fails after the record change committed, the change is NOT rolled
//! back; the failure surfaces as the distinct `AuditWrite` error so the
//! operator knows the data moved but may be unaudited.

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::audit::{
    AuditAction, AuditEntry, AuditService, Draft, FieldChange, compute_changes, schema_for,
};
use crate::audit::storage::AuditStorageError;
use crate::db::repository::RecordStore;
use crate::inventory::{InventoryLedger, ReconcileError, StockDelta, aggregate_deltas};
use crate::mutation::gate::{Authorization, SensitiveAction};
use shared::error::{AppError, ErrorCode};

/// One record mutation, expressed as before/after drafts
///
/// - create: `before = None`, `after = Some`
/// - update: both present (`record_id` required)
/// - delete: `before = Some`, `after = None` (`record_id` required)
#[derive(Debug)]
pub struct MutationRequest {
    pub table: String,
    pub record_id: Option<RecordId>,
    pub before: Option<Draft>,
    pub after: Option<Draft>,
    pub reason: String,
}

/// Result of a committed mutation
#[derive(Debug)]
pub struct MutationOutcome {
    pub record_id: RecordId,
    pub action: AuditAction,
    pub changes: Vec<FieldChange>,
    pub audit_entries: Vec<AuditEntry>,
}

/// Mutation errors, machine-distinguishable per kind
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown entity type: {0}")]
    UnknownEntity(String),

    #[error("Record {table}:{id} not found")]
    NotFound { table: String, id: String },

    #[error(transparent)]
    Reconciliation(#[from] ReconcileError),

    #[error("Mutation committed but audit write failed: {0}")]
    AuditWrite(#[source] AuditStorageError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<MutationError> for AppError {
    fn from(err: MutationError) -> Self {
        match err {
            MutationError::Validation(msg) => AppError::validation(msg),
            MutationError::UnknownEntity(table) => {
                AppError::with_message(ErrorCode::UnknownEntityType, format!("Unknown entity type: {table}"))
            }
            MutationError::NotFound { table, id } => AppError::record_not_found(table, id),
            MutationError::Reconciliation(e) => e.into(),
            MutationError::AuditWrite(e) => {
                AppError::with_message(ErrorCode::AuditWriteFailed, e.to_string())
            }
            MutationError::Database(msg) => AppError::database(msg),
        }
    }
}

/// The audit-logged mutation engine
#[derive(Clone)]
pub struct MutationEngine {
    records: RecordStore,
    ledger: InventoryLedger,
    audit: AuditService,
}

impl MutationEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            records: RecordStore::new(db.clone()),
            ledger: InventoryLedger::new(db.clone()),
            audit: AuditService::new(db),
        }
    }

    pub fn audit(&self) -> &AuditService {
        &self.audit
    }

    /// Submit one mutation under a gate authorization
    pub async fn submit(
        &self,
        auth: &Authorization,
        req: MutationRequest,
    ) -> Result<MutationOutcome, MutationError> {
        let schema = schema_for(&req.table)
            .ok_or_else(|| MutationError::UnknownEntity(req.table.clone()))?;

        let expected = match (&req.before, &req.after) {
            (None, None) => {
                return Err(MutationError::Validation(
                    "Either a before or an after state is required".into(),
                ));
            }
            (Some(_), None) => SensitiveAction::Delete,
            _ => SensitiveAction::Edit,
        };
        if auth.action() != expected {
            return Err(MutationError::Validation(format!(
                "Authorization covers {:?}, not {:?}",
                auth.action(),
                expected
            )));
        }
        if req.reason.trim().is_empty() {
            return Err(MutationError::Validation("A justification is required".into()));
        }

        match (req.before, req.after) {
            (None, Some(after)) => {
                self.create(schema.stock_direction, req.record_id, after, auth, &req.reason)
                    .await
            }
            (Some(before), None) => {
                let id = req.record_id.ok_or_else(|| {
                    MutationError::Validation("record_id is required for delete".into())
                })?;
                self.delete(schema.stock_direction, id, before, auth, &req.reason)
                    .await
            }
            (Some(before), Some(after)) => {
                let id = req.record_id.ok_or_else(|| {
                    MutationError::Validation("record_id is required for update".into())
                })?;
                self.update(schema.stock_direction, id, before, after, auth, &req.reason)
                    .await
            }
            (None, None) => unreachable!(),
        }
    }

    /// Diff + audit for records persisted outside the generic store
    /// (accounts hash their credential in their own repository). The gate
    /// authorization is still required, so the pipeline stays closed.
    pub async fn record_changes(
        &self,
        auth: &Authorization,
        table: &str,
        record_key: &str,
        action: AuditAction,
        before: Option<&Draft>,
        after: Option<&Draft>,
        reason: &str,
    ) -> Result<Vec<AuditEntry>, MutationError> {
        let expected = match action {
            AuditAction::Delete => SensitiveAction::Delete,
            _ => SensitiveAction::Edit,
        };
        if auth.action() != expected {
            return Err(MutationError::Validation(format!(
                "Authorization covers {:?}, not {:?}",
                auth.action(),
                expected
            )));
        }

        let changes = compute_changes(before, after);
        if changes.is_empty() {
            return Ok(Vec::new());
        }
        self.audit
            .record_mutation(table, record_key, action, &changes, auth.actor_id(), reason)
            .await
            .map_err(MutationError::AuditWrite)
    }

    // Create: insert the record, then apply line items to stock. If the
    // stock application fails (already compensated internally), the fresh
    // insert is removed best-effort so a retry starts clean.
    async fn create(
        &self,
        stock_direction: Option<i64>,
        record_id: Option<RecordId>,
        after: Draft,
        auth: &Authorization,
        reason: &str,
    ) -> Result<MutationOutcome, MutationError> {
        let id = record_id.unwrap_or_else(|| RecordStore::new_id(after.table()));

        self.records
            .create(&id, after.content())
            .await
            .map_err(|e| MutationError::Database(e.to_string()))?;

        if let Some(direction) = stock_direction {
            let deltas = aggregate_deltas(&after.line_items());
            if let Err(err) = self.ledger.apply_delta(&deltas, direction).await {
                if let Err(cleanup) = self.records.delete(&id).await {
                    tracing::error!(
                        record = %id,
                        error = %cleanup,
                        "Failed to remove record after stock failure"
                    );
                }
                return Err(err.into());
            }
        }

        self.finish(id, AuditAction::Insert, None, Some(&after), auth, reason)
            .await
    }

    // Delete: revert the line items from stock, then remove the record.
    // A failed removal re-applies the reverted stock before reporting.
    async fn delete(
        &self,
        stock_direction: Option<i64>,
        id: RecordId,
        before: Draft,
        auth: &Authorization,
        reason: &str,
    ) -> Result<MutationOutcome, MutationError> {
        self.ensure_exists(&id, before.table()).await?;

        let deltas = match stock_direction {
            Some(direction) => {
                let deltas = aggregate_deltas(&before.line_items());
                self.ledger.apply_delta(&deltas, -direction).await?;
                Some((deltas, direction))
            }
            None => None,
        };

        if let Err(err) = self.records.delete(&id).await {
            if let Some((deltas, direction)) = deltas {
                self.restore_stock(&deltas, direction).await;
            }
            return Err(MutationError::Database(err.to_string()));
        }

        self.finish(id, AuditAction::Delete, Some(&before), None, auth, reason)
            .await
    }

    // Update: revert old items, apply new items (the ledger restores the
    // old state itself if the new application fails), then replace the
    // record. A failed replace walks the stock back to the old state.
    async fn update(
        &self,
        stock_direction: Option<i64>,
        id: RecordId,
        before: Draft,
        after: Draft,
        auth: &Authorization,
        reason: &str,
    ) -> Result<MutationOutcome, MutationError> {
        self.ensure_exists(&id, before.table()).await?;

        let changes = compute_changes(Some(&before), Some(&after));
        if changes.is_empty() {
            return Ok(MutationOutcome {
                record_id: id,
                action: AuditAction::Update,
                changes,
                audit_entries: Vec::new(),
            });
        }

        let stock = match stock_direction {
            Some(direction) => {
                let old_deltas = aggregate_deltas(&before.line_items());
                let new_deltas = aggregate_deltas(&after.line_items());
                self.ledger
                    .revert_and_apply(&old_deltas, &new_deltas, direction)
                    .await?;
                Some((old_deltas, new_deltas, direction))
            }
            None => None,
        };

        if let Err(err) = self.records.update(&id, after.content()).await {
            if let Some((old_deltas, new_deltas, direction)) = stock {
                // Walk stock back: remove the new items, re-apply the old
                if self.ledger.apply_delta(&new_deltas, -direction).await.is_ok() {
                    self.restore_stock(&old_deltas, direction).await;
                } else {
                    tracing::error!(
                        record = %id,
                        "Stock walk-back failed after record update failure — manual reconciliation needed"
                    );
                }
            }
            return Err(MutationError::Database(err.to_string()));
        }

        let outcome = self
            .finish(id, AuditAction::Update, Some(&before), Some(&after), auth, reason)
            .await?;
        debug_assert_eq!(outcome.changes, changes);
        Ok(outcome)
    }

    /// Diff and append audit rows for a committed mutation
    async fn finish(
        &self,
        id: RecordId,
        action: AuditAction,
        before: Option<&Draft>,
        after: Option<&Draft>,
        auth: &Authorization,
        reason: &str,
    ) -> Result<MutationOutcome, MutationError> {
        let table = before.or(after).map(|d| d.table()).unwrap_or_default();
        let record_key = id.key().to_string();
        let changes = compute_changes(before, after);

        let audit_entries = self
            .audit
            .record_mutation(table, &record_key, action, &changes, auth.actor_id(), reason)
            .await
            .map_err(|e| {
                tracing::error!(
                    table = table,
                    record = %record_key,
                    error = %e,
                    "Mutation committed but audit write failed"
                );
                MutationError::AuditWrite(e)
            })?;

        tracing::info!(
            table = table,
            record = %record_key,
            action = %action,
            actor = %auth.actor_id(),
            fields = changes.len(),
            "Mutation committed"
        );

        Ok(MutationOutcome {
            record_id: id,
            action,
            changes,
            audit_entries,
        })
    }

    /// The target may vanish between selection and action (concurrent
    /// delete); surface that as the terminal not-found error.
    async fn ensure_exists(&self, id: &RecordId, table: &str) -> Result<(), MutationError> {
        let existing = self
            .records
            .select(id)
            .await
            .map_err(|e| MutationError::Database(e.to_string()))?;
        if existing.is_none() {
            return Err(MutationError::NotFound {
                table: table.to_string(),
                id: id.key().to_string(),
            });
        }
        Ok(())
    }

    /// Best-effort re-application of reverted stock
    async fn restore_stock(&self, deltas: &[StockDelta], direction: i64) {
        if let Err(err) = self.ledger.apply_delta(deltas, direction).await {
            tracing::error!(
                error = %err,
                "Failed to restore stock after record write failure — manual reconciliation needed"
            );
        }
    }
}
