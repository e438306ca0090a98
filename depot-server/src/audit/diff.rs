//! 审计 diff 计算
//!
//! 比较同一记录的两个 Draft，生成字段级变更列表。
//! 创建/删除退化为单条 `entire_record` 变更；列表字段整体比较，
//! 每次变更最多产生一条记录。
//!
//! 纯函数：相同输入永远得到相同且顺序一致的输出，
//! 字段顺序取 schema 声明顺序。

use super::draft::{Draft, canonical_string};
use super::types::{ENTIRE_RECORD, FieldChange};

/// 计算 before → after 的字段变更
///
/// - 两者皆空：空列表
/// - before 为空（创建）：单条 `entire_record`，new_value 为序列化快照
/// - after 为空（删除）：单条 `entire_record`，old_value 为序列化快照
/// - 其余：按声明顺序逐字段比较规范化字符串，仅在不同时产出
pub fn compute_changes(before: Option<&Draft>, after: Option<&Draft>) -> Vec<FieldChange> {
    match (before, after) {
        (None, None) => Vec::new(),
        (None, Some(created)) => vec![FieldChange {
            field: ENTIRE_RECORD.to_string(),
            old_value: None,
            new_value: Some(created.serialize()),
        }],
        (Some(deleted), None) => vec![FieldChange {
            field: ENTIRE_RECORD.to_string(),
            old_value: Some(deleted.serialize()),
            new_value: None,
        }],
        (Some(before), Some(after)) => {
            debug_assert_eq!(before.table(), after.table());

            let mut changes = Vec::new();
            for spec in before.schema().fields {
                let old_value = canonical_string(&spec.kind, before.get(spec.name));
                let new_value = canonical_string(&spec.kind, after.get(spec.name));
                if old_value != new_value {
                    changes.push(FieldChange {
                        field: spec.name.to_string(),
                        old_value,
                        new_value,
                    });
                }
            }
            changes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::schema::schema_for;
    use serde_json::json;

    fn receipt(value: serde_json::Value) -> Draft {
        Draft::from_value(schema_for("receipt").unwrap(), value)
    }

    fn sample() -> Draft {
        receipt(json!({
            "receipt_no": "R-2026-001",
            "supplier": "ACME Office",
            "received_at": "2026-03-02",
            "items": [
                { "consumable": "consumable:toner_bk", "quantity": 5, "unit_price": 10, "unit": "pcs" },
            ],
            "note": null,
        }))
    }

    #[test]
    fn both_absent_yields_empty() {
        assert!(compute_changes(None, None).is_empty());
    }

    #[test]
    fn no_op_diff_is_empty() {
        let a = sample();
        let b = sample();
        assert!(compute_changes(Some(&a), Some(&b)).is_empty());
    }

    #[test]
    fn creation_and_deletion_are_symmetric_sentinels() {
        let d = sample();

        let created = compute_changes(None, Some(&d));
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].field, ENTIRE_RECORD);
        assert_eq!(created[0].old_value, None);
        assert_eq!(created[0].new_value, Some(d.serialize()));

        let deleted = compute_changes(Some(&d), None);
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].field, ENTIRE_RECORD);
        assert_eq!(deleted[0].old_value, Some(d.serialize()));
        assert_eq!(deleted[0].new_value, None);
    }

    #[test]
    fn changed_fields_are_emitted_in_declared_order() {
        let before = sample();
        let after = receipt(json!({
            "receipt_no": "R-2026-002",
            "supplier": "ACME Office",
            "received_at": "2026-03-03",
            "items": [
                { "consumable": "consumable:toner_bk", "quantity": 5, "unit_price": 10, "unit": "pcs" },
            ],
            "note": "corrected date",
        }));

        let changes = compute_changes(Some(&before), Some(&after));
        let fields: Vec<&str> = changes.iter().map(|c| c.field.as_str()).collect();
        // Declared order: receipt_no, supplier, received_at, items, note
        assert_eq!(fields, vec!["receipt_no", "received_at", "note"]);
    }

    #[test]
    fn list_field_is_order_insensitive() {
        let before = receipt(json!({
            "items": [
                { "consumable": "consumable:a", "quantity": 5, "unit_price": 10, "unit": "pcs" },
                { "consumable": "consumable:b", "quantity": 1, "unit_price": 2, "unit": "box" },
            ]
        }));
        let after = receipt(json!({
            "items": [
                { "consumable": "consumable:b", "quantity": 1, "unit_price": 2.0, "unit": "box" },
                { "consumable": "consumable:a", "quantity": 5, "unit_price": 10, "unit": "pcs" },
            ]
        }));
        assert!(compute_changes(Some(&before), Some(&after)).is_empty());
    }

    #[test]
    fn list_field_changes_emit_one_change_for_the_whole_list() {
        let before = sample();
        let after = receipt(json!({
            "receipt_no": "R-2026-001",
            "supplier": "ACME Office",
            "received_at": "2026-03-02",
            "items": [
                { "consumable": "consumable:toner_bk", "quantity": 8, "unit_price": 10, "unit": "pcs" },
            ],
        }));

        let changes = compute_changes(Some(&before), Some(&after));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "items");
        assert!(changes[0].old_value.as_deref().unwrap().contains("\"quantity\":5"));
        assert!(changes[0].new_value.as_deref().unwrap().contains("\"quantity\":8"));
    }

    #[test]
    fn numeric_string_vs_number_is_not_a_change() {
        let schema = schema_for("consumable").unwrap();
        let before = Draft::from_value(schema, json!({ "name": "Toner", "warn_threshold": "6" }));
        let after = Draft::from_value(schema, json!({ "name": "Toner", "warn_threshold": 6 }));
        assert!(compute_changes(Some(&before), Some(&after)).is_empty());
    }

    #[test]
    fn deterministic_across_calls() {
        let before = sample();
        let after = receipt(json!({
            "receipt_no": "R-2026-777",
            "supplier": "Other",
            "received_at": "2026-04-01",
            "items": [],
            "note": "rewritten",
        }));

        let first = compute_changes(Some(&before), Some(&after));
        let second = compute_changes(Some(&before), Some(&after));
        assert_eq!(first, second);
    }
}
