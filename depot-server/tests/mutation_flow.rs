//! End-to-end flow of the audit-logged mutation engine against an
//! in-memory database: create / edit / delete a receipt, watch the stock
//! counter and the audit trail, and check the step-up gate blocks bad
//! credentials.
//! Run: cargo test -p depot-server --test mutation_flow

use depot_server::audit::{
    AuditAction, AuditQuery, AuditStorage, Draft, ENTIRE_RECORD, FieldChange, HistoryService,
    schema_for,
};
use depot_server::db::models::{LineItem, Receipt};
use depot_server::db::repository::AccountRepository;
use depot_server::mutation::engine::{MutationEngine, MutationError, MutationRequest};
use depot_server::mutation::gate::{self, Authorization, SensitiveAction};
use rust_decimal::Decimal;
use shared::error::ErrorCode;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ADMIN_PASSWORD: &str = "pw-for-tests";

struct Harness {
    db: Surreal<Db>,
    engine: MutationEngine,
    accounts: AccountRepository,
    admin_id: String,
}

async fn setup() -> Harness {
    let db = depot_server::db::open_memory().await.unwrap();
    let accounts = AccountRepository::new(db.clone());
    accounts.ensure_system_admin(ADMIN_PASSWORD).await.unwrap();
    let admin = accounts.find_by_username("admin").await.unwrap().unwrap();
    let admin_id = admin.id.as_ref().unwrap().to_string();
    let engine = MutationEngine::new(db.clone());
    Harness {
        db,
        engine,
        accounts,
        admin_id,
    }
}

async fn seed_consumable(db: &Surreal<Db>, key: &str) -> String {
    db.query(
        "CREATE type::thing('consumable', $key) SET name = $key, unit = 'pcs', \
         stock_quantity = 0, warn_threshold = 0",
    )
    .bind(("key", key.to_string()))
    .await
    .unwrap();
    format!("consumable:{key}")
}

async fn stock_of(db: &Surreal<Db>, id: &str) -> i64 {
    #[derive(serde::Deserialize)]
    struct Row {
        stock_quantity: i64,
    }
    let rid: surrealdb::RecordId = id.parse().unwrap();
    let mut result = db
        .query("SELECT stock_quantity FROM $thing")
        .bind(("thing", rid))
        .await
        .unwrap();
    let rows: Vec<Row> = result.take(0).unwrap();
    rows.into_iter().next().unwrap().stock_quantity
}

async fn authorize(h: &Harness, action: SensitiveAction, reason: Option<&str>) -> Authorization {
    gate::authorize(
        h.accounts.clone(),
        action,
        &h.admin_id,
        "Administrator",
        ADMIN_PASSWORD,
        reason,
    )
    .await
    .unwrap()
}

fn receipt_with_quantity(consumable: &str, quantity: i64) -> Receipt {
    Receipt {
        id: None,
        receipt_no: "R-2026-001".into(),
        supplier: "ACME Office".into(),
        received_at: "2026-03-02".into(),
        items: vec![LineItem {
            consumable: consumable.to_string(),
            quantity,
            unit_price: Decimal::from(10),
            unit: "pcs".into(),
        }],
        note: None,
    }
}

fn receipt_draft(receipt: &Receipt) -> Draft {
    Draft::from_model(schema_for("receipt").unwrap(), receipt).unwrap()
}

#[tokio::test]
async fn full_receipt_lifecycle_is_reconciled_and_audited() {
    let h = setup().await;
    let p1 = seed_consumable(&h.db, "p1").await;
    let history = HistoryService::new(h.db.clone());

    // 1. Create a receipt: 5 × P1 against stock 0 → stock 5,
    //    one INSERT audit row with the entire_record sentinel.
    let created = receipt_with_quantity(&p1, 5);
    let auth = authorize(&h, SensitiveAction::Edit, Some("initial intake")).await;
    let outcome = h
        .engine
        .submit(
            &auth,
            MutationRequest {
                table: "receipt".into(),
                record_id: None,
                before: None,
                after: Some(receipt_draft(&created)),
                reason: "initial intake".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(stock_of(&h.db, &p1).await, 5);
    assert_eq!(outcome.audit_entries.len(), 1);
    assert_eq!(outcome.audit_entries[0].action, AuditAction::Insert);
    assert_eq!(outcome.audit_entries[0].field_name, ENTIRE_RECORD);

    let record_key = outcome.record_id.key().to_string();

    // 2. Edit the receipt: quantity 5 → 8 → stock 8 (revert −5, apply +8),
    //    one UPDATE audit row on the items field, reason stored verbatim.
    let before = created.clone();
    let mut after = created.clone();
    after.items[0].quantity = 8;

    let auth = authorize(&h, SensitiveAction::Edit, Some("miscounted the delivery")).await;
    let outcome = h
        .engine
        .submit(
            &auth,
            MutationRequest {
                table: "receipt".into(),
                record_id: Some(outcome.record_id.clone()),
                before: Some(receipt_draft(&before)),
                after: Some(receipt_draft(&after)),
                reason: "miscounted the delivery".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(stock_of(&h.db, &p1).await, 8);
    assert_eq!(outcome.audit_entries.len(), 1);
    assert_eq!(outcome.audit_entries[0].action, AuditAction::Update);
    assert_eq!(outcome.audit_entries[0].field_name, "items");
    assert_eq!(outcome.audit_entries[0].reason, "miscounted the delivery");
    assert!(outcome.audit_entries[0]
        .old_value
        .as_deref()
        .unwrap()
        .contains("\"quantity\":5"));
    assert!(outcome.audit_entries[0]
        .new_value
        .as_deref()
        .unwrap()
        .contains("\"quantity\":8"));

    // 4. (before the delete) A wrong credential leaves no trace: the gate
    //    rejects, stock and audit log stay untouched.
    let gate_err = gate::authorize(
        h.accounts.clone(),
        SensitiveAction::Delete,
        &h.admin_id,
        "Administrator",
        "wrong-password",
        Some("should never reach the engine"),
    )
    .await
    .unwrap_err();
    assert_eq!(gate_err.code, ErrorCode::InvalidCredentials);
    assert_eq!(stock_of(&h.db, &p1).await, 8);
    let (_, total_before) = h
        .engine
        .audit()
        .query(&AuditQuery::default())
        .await
        .unwrap();

    // 3. Delete the receipt → stock back to 0, one DELETE audit row with
    //    the entire_record sentinel.
    let auth = authorize(&h, SensitiveAction::Delete, Some("duplicate entry")).await;
    let outcome = h
        .engine
        .submit(
            &auth,
            MutationRequest {
                table: "receipt".into(),
                record_id: Some(outcome.record_id.clone()),
                before: Some(receipt_draft(&after)),
                after: None,
                reason: "duplicate entry".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(stock_of(&h.db, &p1).await, 0);
    assert_eq!(outcome.audit_entries.len(), 1);
    assert_eq!(outcome.audit_entries[0].action, AuditAction::Delete);
    assert_eq!(outcome.audit_entries[0].field_name, ENTIRE_RECORD);

    let (_, total_after) = h
        .engine
        .audit()
        .query(&AuditQuery::default())
        .await
        .unwrap();
    assert_eq!(total_after, total_before + 1);

    // 5. History: three rows newest-first, actor resolved to a display name.
    let entries = history.fetch_history("receipt", &record_key).await.unwrap();
    assert_eq!(entries.len(), 3);
    let actions: Vec<AuditAction> = entries.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::Delete, AuditAction::Update, AuditAction::Insert]
    );
    assert!(entries.windows(2).all(|w| w[0].sequence > w[1].sequence));
    for entry in &entries {
        assert_eq!(entry.changed_by_name, "Administrator");
    }
}

#[tokio::test]
async fn authorization_kind_must_match_the_submitted_action() {
    let h = setup().await;
    let p1 = seed_consumable(&h.db, "p1").await;

    // An Edit authorization cannot drive a delete
    let receipt = receipt_with_quantity(&p1, 5);
    let edit_auth = authorize(&h, SensitiveAction::Edit, Some("intake")).await;
    let err = h
        .engine
        .submit(
            &edit_auth,
            MutationRequest {
                table: "receipt".into(),
                record_id: None,
                before: Some(receipt_draft(&receipt)),
                after: None,
                reason: "intake".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MutationError::Validation(_)));
    assert_eq!(stock_of(&h.db, &p1).await, 0);
}

#[tokio::test]
async fn deleting_a_vanished_record_is_a_terminal_not_found() {
    let h = setup().await;
    let p1 = seed_consumable(&h.db, "p1").await;

    let receipt = receipt_with_quantity(&p1, 5);
    let auth = authorize(&h, SensitiveAction::Delete, Some("cleanup")).await;
    let err = h
        .engine
        .submit(
            &auth,
            MutationRequest {
                table: "receipt".into(),
                record_id: Some(surrealdb::RecordId::from_table_key("receipt", 424242)),
                before: Some(receipt_draft(&receipt)),
                after: None,
                reason: "cleanup".into(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, MutationError::NotFound { .. }));
    // Nothing moved
    assert_eq!(stock_of(&h.db, &p1).await, 0);
}

#[tokio::test]
async fn failed_reconciliation_leaves_no_record_behind() {
    let h = setup().await;
    let p1 = seed_consumable(&h.db, "p1").await;

    // Second line targets a missing SKU: the stock prefix is compensated
    // and the just-inserted record is removed again.
    let mut receipt = receipt_with_quantity(&p1, 5);
    receipt.items.push(LineItem {
        consumable: "consumable:missing".into(),
        quantity: 2,
        unit_price: Decimal::from(3),
        unit: "pcs".into(),
    });

    let auth = authorize(&h, SensitiveAction::Edit, Some("intake")).await;
    let err = h
        .engine
        .submit(
            &auth,
            MutationRequest {
                table: "receipt".into(),
                record_id: None,
                before: None,
                after: Some(receipt_draft(&receipt)),
                reason: "intake".into(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, MutationError::Reconciliation(_)));
    assert_eq!(stock_of(&h.db, &p1).await, 0);

    // No receipt rows survived the failed create
    let mut result = h.db.query("SELECT * FROM receipt").await.unwrap();
    let rows: Vec<serde_json::Value> = result.take(0).unwrap();
    assert!(rows.is_empty());

    // And no audit row was written for the failed attempt
    let (_, total) = h
        .engine
        .audit()
        .query(&AuditQuery::default())
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn no_op_update_writes_no_audit_rows_and_moves_no_stock() {
    let h = setup().await;
    let p1 = seed_consumable(&h.db, "p1").await;

    let receipt = receipt_with_quantity(&p1, 5);
    let auth = authorize(&h, SensitiveAction::Edit, Some("intake")).await;
    let outcome = h
        .engine
        .submit(
            &auth,
            MutationRequest {
                table: "receipt".into(),
                record_id: None,
                before: None,
                after: Some(receipt_draft(&receipt)),
                reason: "intake".into(),
            },
        )
        .await
        .unwrap();

    // Same content, items listed in a different order: not a change
    let mut reordered = receipt.clone();
    reordered.items.reverse();

    let auth = authorize(&h, SensitiveAction::Edit, Some("touch")).await;
    let noop = h
        .engine
        .submit(
            &auth,
            MutationRequest {
                table: "receipt".into(),
                record_id: Some(outcome.record_id.clone()),
                before: Some(receipt_draft(&receipt)),
                after: Some(receipt_draft(&reordered)),
                reason: "touch".into(),
            },
        )
        .await
        .unwrap();

    assert!(noop.changes.is_empty());
    assert!(noop.audit_entries.is_empty());
    assert_eq!(stock_of(&h.db, &p1).await, 5);
}

#[tokio::test]
async fn history_falls_back_to_raw_actor_id_for_unknown_accounts() {
    let h = setup().await;

    // A row attributed to an account that no longer resolves
    let storage = AuditStorage::new(h.db.clone());
    storage
        .append_batch(
            "equipment",
            "77",
            AuditAction::Insert,
            &[FieldChange {
                field: ENTIRE_RECORD.to_string(),
                old_value: None,
                new_value: Some("{}".to_string()),
            }],
            "account:ghost",
            "registered",
        )
        .await
        .unwrap();

    let history = HistoryService::new(h.db.clone());
    let entries = history.fetch_history("equipment", "77").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].changed_by, "account:ghost");
    assert_eq!(entries[0].changed_by_name, "account:ghost");
}

#[tokio::test]
async fn audit_chain_stays_intact_across_mutations() {
    let h = setup().await;
    let p1 = seed_consumable(&h.db, "p1").await;

    let receipt = receipt_with_quantity(&p1, 5);
    let auth = authorize(&h, SensitiveAction::Edit, Some("intake")).await;
    let outcome = h
        .engine
        .submit(
            &auth,
            MutationRequest {
                table: "receipt".into(),
                record_id: None,
                before: None,
                after: Some(receipt_draft(&receipt)),
                reason: "intake".into(),
            },
        )
        .await
        .unwrap();

    let mut after = receipt.clone();
    after.items[0].quantity = 8;
    after.supplier = "Replacement Supplier".into();
    let auth = authorize(&h, SensitiveAction::Edit, Some("correction")).await;
    h.engine
        .submit(
            &auth,
            MutationRequest {
                table: "receipt".into(),
                record_id: Some(outcome.record_id.clone()),
                before: Some(receipt_draft(&receipt)),
                after: Some(receipt_draft(&after)),
                reason: "correction".into(),
            },
        )
        .await
        .unwrap();

    let verification = h.engine.audit().verify_chain().await.unwrap();
    assert!(verification.chain_intact);
    // 1 sentinel row + 2 field rows (supplier, items)
    assert_eq!(verification.total_entries, 3);
    assert!(verification.breaks.is_empty());
}
