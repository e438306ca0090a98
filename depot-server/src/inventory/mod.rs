//! Inventory ledger
//!
//! Applies signed quantity deltas to the denormalized `stock_quantity`
//! counter on consumable rows. Used symmetrically by the mutation engine:
//! create applies `+direction`, delete applies `-direction`, update reverts
//! the old items and applies the new ones.
//!
//! The store offers per-row atomicity only, so a multi-item delta that
//! fails partway is compensated by best-effort reversal of the prefix that
//! was already applied; the whole operation is then reported as failed and
//! must be retried by the caller.
//!
//! No floor is enforced: stock may go negative (over-issuance), which is a
//! reporting signal, not an error.

use thiserror::Error;

use crate::db::models::LineItem;
use crate::db::repository::parse_record_id;
use shared::error::{AppError, ErrorCode};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// One consumable's aggregated quantity within a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDelta {
    pub consumable: String,
    pub quantity: i64,
}

/// Aggregate line items into per-consumable deltas
///
/// Two lines for the same consumable must land as one delta, otherwise a
/// failure between them would compensate only half of the row's movement.
pub fn aggregate_deltas(items: &[LineItem]) -> Vec<StockDelta> {
    let mut deltas: Vec<StockDelta> = Vec::new();
    for item in items {
        match deltas.iter_mut().find(|d| d.consumable == item.consumable) {
            Some(existing) => existing.quantity += item.quantity,
            None => deltas.push(StockDelta {
                consumable: item.consumable.clone(),
                quantity: item.quantity,
            }),
        }
    }
    deltas
}

/// Reconciliation errors
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Consumable {0} not found")]
    ConsumableNotFound(String),

    #[error("Stock write failed for {consumable}: {message}")]
    WriteFailed { consumable: String, message: String },
}

impl From<ReconcileError> for AppError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::ConsumableNotFound(id) => {
                AppError::with_message(ErrorCode::ConsumableNotFound, format!("Consumable {id} not found"))
            }
            ReconcileError::WriteFailed { .. } => {
                AppError::with_message(ErrorCode::StockWriteFailed, err.to_string())
            }
        }
    }
}

/// Inventory ledger over the consumable table
#[derive(Clone)]
pub struct InventoryLedger {
    db: Surreal<Db>,
}

impl InventoryLedger {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Apply `direction * quantity` for every delta, in order
    ///
    /// On failure at item `k`, items `0..k` are reversed (best effort)
    /// before the error is surfaced; the caller retries the whole
    /// operation.
    pub async fn apply_delta(
        &self,
        deltas: &[StockDelta],
        direction: i64,
    ) -> Result<(), ReconcileError> {
        for (applied, delta) in deltas.iter().enumerate() {
            if let Err(err) = self.apply_one(delta, direction).await {
                self.compensate(&deltas[..applied], direction).await;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Update path: revert the old items, then apply the new ones
    ///
    /// If applying the new items fails after the old ones were reverted,
    /// the old items are re-applied so the pre-operation state is restored
    /// before the error is reported.
    pub async fn revert_and_apply(
        &self,
        old_deltas: &[StockDelta],
        new_deltas: &[StockDelta],
        direction: i64,
    ) -> Result<(), ReconcileError> {
        self.apply_delta(old_deltas, -direction).await?;

        if let Err(err) = self.apply_delta(new_deltas, direction).await {
            if let Err(restore_err) = self.apply_delta(old_deltas, direction).await {
                tracing::error!(
                    error = %restore_err,
                    "Failed to restore stock after update failure — manual reconciliation needed"
                );
            }
            return Err(err);
        }
        Ok(())
    }

    /// Single-row read-modify-write
    ///
    /// Race window between read and write across concurrent sessions is a
    /// known limitation of the per-row store; hardening would replace this
    /// with a single `UPDATE … SET stock_quantity += $delta` statement.
    async fn apply_one(&self, delta: &StockDelta, direction: i64) -> Result<(), ReconcileError> {
        let current = self.read_stock(&delta.consumable).await?;
        let new_stock = current + direction * delta.quantity;
        self.write_stock(&delta.consumable, new_stock).await?;

        tracing::debug!(
            consumable = %delta.consumable,
            from = current,
            to = new_stock,
            "Stock updated"
        );
        Ok(())
    }

    /// Best-effort reversal of an already-applied prefix
    async fn compensate(&self, applied: &[StockDelta], direction: i64) {
        for delta in applied.iter().rev() {
            if let Err(err) = self.apply_one(delta, -direction).await {
                tracing::error!(
                    consumable = %delta.consumable,
                    error = %err,
                    "Stock compensation failed — manual reconciliation needed"
                );
            }
        }
    }

    async fn read_stock(&self, consumable: &str) -> Result<i64, ReconcileError> {
        let rid = parse_record_id("consumable", consumable)
            .map_err(|_| ReconcileError::ConsumableNotFound(consumable.to_string()))?;

        // The engine may return the counter as int or float depending on
        // how the row was written; accept both.
        #[derive(serde::Deserialize)]
        struct Row {
            stock_quantity: Option<serde_json::Number>,
        }

        let mut result = self
            .db
            .query("SELECT stock_quantity FROM $thing")
            .bind(("thing", rid))
            .await
            .map_err(|e| ReconcileError::WriteFailed {
                consumable: consumable.to_string(),
                message: e.to_string(),
            })?;
        let rows: Vec<Row> = result.take(0).map_err(|e| ReconcileError::WriteFailed {
            consumable: consumable.to_string(),
            message: e.to_string(),
        })?;

        match rows.into_iter().next() {
            Some(row) => Ok(row
                .stock_quantity
                .and_then(|n| n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)))
                .unwrap_or(0)),
            None => Err(ReconcileError::ConsumableNotFound(consumable.to_string())),
        }
    }

    async fn write_stock(&self, consumable: &str, quantity: i64) -> Result<(), ReconcileError> {
        let rid = parse_record_id("consumable", consumable)
            .map_err(|_| ReconcileError::ConsumableNotFound(consumable.to_string()))?;

        self.db
            .query("UPDATE $thing SET stock_quantity = $quantity")
            .bind(("thing", rid))
            .bind(("quantity", quantity))
            .await
            .map_err(|e| ReconcileError::WriteFailed {
                consumable: consumable.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    async fn test_db() -> Surreal<Db> {
        crate::db::open_memory().await.unwrap()
    }

    async fn seed_consumable(db: &Surreal<Db>, key: &str, stock: i64) -> String {
        db.query("CREATE type::thing('consumable', $key) SET name = $key, unit = 'pcs', stock_quantity = $stock, warn_threshold = 0")
            .bind(("key", key.to_string()))
            .bind(("stock", stock))
            .await
            .unwrap();
        format!("consumable:{key}")
    }

    async fn stock_of(ledger: &InventoryLedger, id: &str) -> i64 {
        ledger.read_stock(id).await.unwrap()
    }

    fn item(consumable: &str, quantity: i64) -> LineItem {
        LineItem {
            consumable: consumable.to_string(),
            quantity,
            unit_price: Decimal::from(10),
            unit: "pcs".into(),
        }
    }

    #[test]
    fn aggregation_merges_duplicate_consumables() {
        let deltas = aggregate_deltas(&[item("consumable:a", 2), item("consumable:b", 1), item("consumable:a", 3)]);
        assert_eq!(
            deltas,
            vec![
                StockDelta { consumable: "consumable:a".into(), quantity: 5 },
                StockDelta { consumable: "consumable:b".into(), quantity: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn applies_signed_deltas() {
        let db = test_db().await;
        let id = seed_consumable(&db, "toner", 0).await;
        let ledger = InventoryLedger::new(db);

        let deltas = vec![StockDelta { consumable: id.clone(), quantity: 5 }];
        ledger.apply_delta(&deltas, 1).await.unwrap();
        assert_eq!(stock_of(&ledger, &id).await, 5);

        ledger.apply_delta(&deltas, -1).await.unwrap();
        assert_eq!(stock_of(&ledger, &id).await, 0);
    }

    #[tokio::test]
    async fn stock_may_go_negative() {
        let db = test_db().await;
        let id = seed_consumable(&db, "ink", 1).await;
        let ledger = InventoryLedger::new(db);

        ledger
            .apply_delta(&[StockDelta { consumable: id.clone(), quantity: 4 }], -1)
            .await
            .unwrap();
        assert_eq!(stock_of(&ledger, &id).await, -3);
    }

    #[tokio::test]
    async fn partial_failure_is_compensated() {
        let db = test_db().await;
        let id = seed_consumable(&db, "paper", 7).await;
        let ledger = InventoryLedger::new(db);

        // Second delta targets a row that does not exist, so the first must
        // be reversed before the error surfaces.
        let deltas = vec![
            StockDelta { consumable: id.clone(), quantity: 5 },
            StockDelta { consumable: "consumable:missing".into(), quantity: 1 },
        ];
        let err = ledger.apply_delta(&deltas, 1).await.unwrap_err();
        assert!(matches!(err, ReconcileError::ConsumableNotFound(_)));
        assert_eq!(stock_of(&ledger, &id).await, 7);
    }

    #[tokio::test]
    async fn update_restores_old_state_when_new_application_fails() {
        let db = test_db().await;
        let id = seed_consumable(&db, "staples", 5).await;
        let ledger = InventoryLedger::new(db);

        let old = vec![StockDelta { consumable: id.clone(), quantity: 5 }];
        let new = vec![StockDelta { consumable: "consumable:missing".into(), quantity: 8 }];

        let err = ledger.revert_and_apply(&old, &new, 1).await.unwrap_err();
        assert!(matches!(err, ReconcileError::ConsumableNotFound(_)));
        // Old items were re-applied: stock is back at 5
        assert_eq!(stock_of(&ledger, &id).await, 5);
    }
}
