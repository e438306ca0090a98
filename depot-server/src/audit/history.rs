//! 审计历史读取
//!
//! 单条记录的变更历史：时间倒序，操作人批量解析为显示名
//! （无法解析时回退为原始 ID），字段值按 schema 类型格式化。
//! 格式化函数是 (表名, 字段名, 原始值) 的纯函数，对任何存储值
//! 都不会失败 — 无法解析的值原样返回。

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::schema::{FieldKind, schema_for};
use super::storage::AuditStorage;
use super::types::{AuditAction, ENTIRE_RECORD};
use crate::db::models::{LineItem, Part};
use crate::db::repository::AccountRepository;
use crate::utils::AppResult;

/// 面向展示的单条历史记录
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub sequence: u64,
    pub action: AuditAction,
    pub field_name: String,
    pub field_label: String,
    /// 原始存储值
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    /// 格式化后的展示值
    pub old_display: Option<String>,
    pub new_display: Option<String>,
    pub changed_by: String,
    pub changed_by_name: String,
    pub reason: String,
    pub changed_at: i64,
}

/// 审计历史服务
#[derive(Clone)]
pub struct HistoryService {
    storage: AuditStorage,
    accounts: AccountRepository,
}

impl HistoryService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            storage: AuditStorage::new(db.clone()),
            accounts: AccountRepository::new(db),
        }
    }

    /// 单条记录的变更历史（最新在前）
    pub async fn fetch_history(
        &self,
        table_name: &str,
        record_id: &str,
    ) -> AppResult<Vec<HistoryEntry>> {
        let entries = self.storage.query_for_record(table_name, record_id).await?;

        // 批量解析操作人显示名
        let mut actor_ids: Vec<String> = entries.iter().map(|e| e.changed_by.clone()).collect();
        actor_ids.sort();
        actor_ids.dedup();
        let names = self.accounts.display_names(&actor_ids).await?;

        Ok(entries
            .into_iter()
            .map(|e| {
                let changed_by_name = names
                    .get(&e.changed_by)
                    .cloned()
                    .unwrap_or_else(|| e.changed_by.clone());
                let field_label = field_label(&e.table_name, &e.field_name);
                let old_display = e
                    .old_value
                    .as_deref()
                    .map(|v| format_value(&e.table_name, &e.field_name, v));
                let new_display = e
                    .new_value
                    .as_deref()
                    .map(|v| format_value(&e.table_name, &e.field_name, v));
                HistoryEntry {
                    sequence: e.id,
                    action: e.action,
                    field_name: e.field_name,
                    field_label,
                    old_value: e.old_value,
                    new_value: e.new_value,
                    old_display,
                    new_display,
                    changed_by: e.changed_by,
                    changed_by_name,
                    reason: e.reason,
                    changed_at: e.changed_at,
                }
            })
            .collect())
    }
}

/// 字段展示标签
fn field_label(table_name: &str, field_name: &str) -> String {
    if field_name == ENTIRE_RECORD {
        return "Entire record".to_string();
    }
    schema_for(table_name)
        .and_then(|s| s.field(field_name))
        .map(|spec| spec.label.to_string())
        .unwrap_or_else(|| field_name.to_string())
}

/// 按字段类型格式化存储值（总是返回一个字符串，绝不 panic）
pub fn format_value(table_name: &str, field_name: &str, raw: &str) -> String {
    if field_name == ENTIRE_RECORD {
        // 快照原样展示
        return raw.to_string();
    }

    let Some(spec) = schema_for(table_name).and_then(|s| s.field(field_name)) else {
        return raw.to_string();
    };

    match spec.kind {
        FieldKind::Text { .. } | FieldKind::Date | FieldKind::Integer => raw.to_string(),
        FieldKind::Currency => Decimal::from_str(raw)
            .map(|d| format!("{d:.2}"))
            .unwrap_or_else(|_| raw.to_string()),
        FieldKind::Bool => match raw {
            "true" => "yes".to_string(),
            "false" => "no".to_string(),
            other => other.to_string(),
        },
        FieldKind::Enum(labels) => labels
            .iter()
            .find(|(value, _)| *value == raw)
            .map(|(_, label)| (*label).to_string())
            .unwrap_or_else(|| raw.to_string()),
        FieldKind::Items => format_items(raw),
        FieldKind::Parts => format_parts(raw),
    }
}

fn format_items(raw: &str) -> String {
    match serde_json::from_str::<Vec<LineItem>>(raw) {
        Ok(items) if items.is_empty() => "(no items)".to_string(),
        Ok(items) => items
            .iter()
            .map(|i| format!("{} {} × {} @ {:.2}", i.quantity, i.unit, i.consumable, i.unit_price))
            .collect::<Vec<_>>()
            .join("; "),
        Err(_) => raw.to_string(),
    }
}

fn format_parts(raw: &str) -> String {
    match serde_json::from_str::<Vec<Part>>(raw) {
        Ok(parts) if parts.is_empty() => "(no parts)".to_string(),
        Ok(parts) => parts
            .iter()
            .map(|p| format!("{} × {}", p.name, p.quantity))
            .collect::<Vec<_>>()
            .join("; "),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_values_get_labels() {
        assert_eq!(format_value("equipment", "status", "in_service"), "In service");
        // Unknown stored value falls back to the raw string
        assert_eq!(format_value("equipment", "status", "scrapped"), "scrapped");
    }

    #[test]
    fn currency_is_rendered_with_two_decimals() {
        assert_eq!(format_value("equipment", "purchase_price", "1200.5"), "1200.50");
        assert_eq!(format_value("equipment", "purchase_price", "not-a-number"), "not-a-number");
    }

    #[test]
    fn items_render_as_a_summary_line() {
        let raw = r#"[{"consumable":"consumable:toner_bk","quantity":5,"unit_price":10.0,"unit":"pcs"}]"#;
        let formatted = format_value("receipt", "items", raw);
        assert!(formatted.contains("5 pcs"));
        assert!(formatted.contains("consumable:toner_bk"));
    }

    #[test]
    fn malformed_values_never_panic() {
        assert_eq!(format_value("receipt", "items", "{broken"), "{broken");
        assert_eq!(format_value("unknown_table", "field", "x"), "x");
        assert_eq!(
            format_value("maintenance", "parts_replaced", "[1,2,3]"),
            "[1,2,3]"
        );
    }

    #[test]
    fn entire_record_is_passed_through() {
        let snapshot = r#"{"receipt_no":"R-1"}"#;
        assert_eq!(format_value("receipt", ENTIRE_RECORD, snapshot), snapshot);
    }
}
