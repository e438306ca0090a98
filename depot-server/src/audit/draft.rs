//! 审计草稿（Draft）
//!
//! Draft 是记录在某一时刻的规范化快照，作为 diff 的比较对象：
//! - 只包含 schema 声明的字段，缺失字段补 Null
//! - 数字消除表示差异（"6" 与 6、5.0 与 5 视为同值）
//! - 列表字段投影到可比较形状并按稳定键排序
//!
//! Draft 一旦构造即不可变；diff 与提交永远使用显式构造的 Draft，
//! 不直接比较可变的表单/模型状态。

use super::schema::{EntitySchema, FieldKind};
use crate::db::models::LineItem;
use serde::Serialize;
use serde_json::{Map, Value};

/// 规范化的记录快照
#[derive(Debug, Clone)]
pub struct Draft {
    schema: &'static EntitySchema,
    fields: Map<String, Value>,
}

impl Draft {
    /// 从任意可序列化模型构造 Draft
    pub fn from_model<T: Serialize>(
        schema: &'static EntitySchema,
        model: &T,
    ) -> Result<Draft, serde_json::Error> {
        let value = serde_json::to_value(model)?;
        Ok(Self::from_value(schema, value))
    }

    /// 从 JSON 值构造 Draft（总是成功；缺失/异常字段按 Null 处理）
    pub fn from_value(schema: &'static EntitySchema, value: Value) -> Draft {
        let source = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let mut fields = Map::new();
        for spec in schema.fields {
            let raw = source.get(spec.name).cloned().unwrap_or(Value::Null);
            fields.insert(spec.name.to_string(), normalize_field(&spec.kind, raw));
        }
        Draft { schema, fields }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    pub fn table(&self) -> &'static str {
        self.schema.table
    }

    /// 取某字段的规范化值（未声明的字段返回 Null）
    pub fn get(&self, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(field).unwrap_or(&NULL)
    }

    /// 持久化内容（全部声明字段）
    pub fn content(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// 规范化序列化形式（`entire_record` 哨兵值）
    ///
    /// 字段集合与构造顺序固定，相同内容的 Draft 序列化结果逐字节一致。
    pub fn serialize(&self) -> String {
        serde_json::to_string(&self.fields).unwrap_or_default()
    }

    /// 解析行项目列表（无 items 字段或无法解析时为空）
    pub fn line_items(&self) -> Vec<LineItem> {
        self.fields
            .get("items")
            .and_then(|v| serde_json::from_value::<Vec<LineItem>>(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// 按字段类型规范化单个值
fn normalize_field(kind: &FieldKind, value: Value) -> Value {
    match kind {
        FieldKind::Text { optional } => match value {
            Value::String(s) if s.is_empty() && *optional => Value::Null,
            other => other,
        },
        FieldKind::Integer | FieldKind::Currency => normalize_number(value),
        FieldKind::Date => match value {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Value::Null
                } else {
                    Value::String(trimmed.to_string())
                }
            }
            other => other,
        },
        FieldKind::Bool => match value {
            Value::String(s) if s == "true" => Value::Bool(true),
            Value::String(s) if s == "false" => Value::Bool(false),
            other => other,
        },
        FieldKind::Enum(_) => value,
        FieldKind::Items => normalize_items(value),
        FieldKind::Parts => normalize_parts(value),
    }
}

/// 数字规范化
///
/// - 字符串形式的数字转为数字（"6" → 6），消除表示差异
/// - 无小数部分的浮点还原为整数（存储引擎将所有数字存为 float，
///   读出后 5 会变成 5.0）
///
/// 安全范围：f64 尾数 52 bit，仅 |value| ≤ 2^53 的整数可无损转换。
fn normalize_number(value: Value) -> Value {
    /// f64 可精确表示的最大整数绝对值 (2^53)
    const MAX_SAFE_INT: f64 = (1_i64 << 53) as f64;

    match value {
        Value::Number(n) => {
            if let Some(f) = n.as_f64()
                && f.fract() == 0.0
                && f.abs() <= MAX_SAFE_INT
            {
                return Value::Number(serde_json::Number::from(f as i64));
            }
            Value::Number(n)
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Value::Null;
            }
            if let Ok(i) = trimmed.parse::<i64>() {
                return Value::Number(serde_json::Number::from(i));
            }
            if let Ok(f) = trimmed.parse::<f64>()
                && let Some(n) = serde_json::Number::from_f64(f)
            {
                return normalize_number(Value::Number(n));
            }
            Value::String(s)
        }
        other => other,
    }
}

/// 行项目规范化：投影到 {consumable, quantity, unit, unit_price}，
/// 按 consumable 排序（同一 SKU 多行时用序列化形式作次序尾键）。
fn normalize_items(value: Value) -> Value {
    let Value::Array(arr) = value else {
        return Value::Array(Vec::new());
    };

    let mut items: Vec<Value> = arr
        .into_iter()
        .filter_map(|v| {
            let obj = v.as_object()?;
            let mut m = Map::new();
            m.insert(
                "consumable".to_string(),
                obj.get("consumable").cloned().unwrap_or(Value::Null),
            );
            m.insert(
                "quantity".to_string(),
                normalize_number(obj.get("quantity").cloned().unwrap_or(Value::Null)),
            );
            m.insert(
                "unit".to_string(),
                obj.get("unit").cloned().unwrap_or(Value::Null),
            );
            m.insert(
                "unit_price".to_string(),
                normalize_number(obj.get("unit_price").cloned().unwrap_or(Value::Null)),
            );
            Some(Value::Object(m))
        })
        .collect();

    items.sort_by_cached_key(|item| {
        let consumable = item
            .get("consumable")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        (consumable, item.to_string())
    });
    Value::Array(items)
}

/// 配件列表规范化：投影到 {name, quantity}，按名称排序。
fn normalize_parts(value: Value) -> Value {
    let Value::Array(arr) = value else {
        return Value::Array(Vec::new());
    };

    let mut parts: Vec<Value> = arr
        .into_iter()
        .filter_map(|v| {
            let obj = v.as_object()?;
            let mut m = Map::new();
            m.insert(
                "name".to_string(),
                obj.get("name").cloned().unwrap_or(Value::Null),
            );
            m.insert(
                "quantity".to_string(),
                normalize_number(obj.get("quantity").cloned().unwrap_or(Value::Null)),
            );
            Some(Value::Object(m))
        })
        .collect();

    parts.sort_by_cached_key(|part| {
        let name = part
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        (name, part.to_string())
    });
    Value::Array(parts)
}

/// 字段的规范化字符串形式（diff 的比较键，也是审计行存储的值）
///
/// Null（以及可选文本的空串）返回 None；其余标量取字面形式，
/// 列表/对象取规范化 JSON。
pub fn canonical_string(kind: &FieldKind, value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => match kind {
            FieldKind::Text { optional: true } if s.is_empty() => None,
            _ => Some(s.clone()),
        },
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => serde_json::to_string(other).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::schema::schema_for;
    use serde_json::json;

    fn receipt_draft(value: Value) -> Draft {
        Draft::from_value(schema_for("receipt").unwrap(), value)
    }

    #[test]
    fn missing_fields_default_to_null() {
        let draft = receipt_draft(json!({ "receipt_no": "R-1" }));
        assert_eq!(draft.get("receipt_no"), &json!("R-1"));
        assert_eq!(draft.get("supplier"), &Value::Null);
        assert_eq!(draft.get("items"), &json!([]));
    }

    #[test]
    fn numeric_representation_is_canonicalized() {
        let schema = schema_for("consumable").unwrap();
        let from_string = Draft::from_value(schema, json!({ "warn_threshold": "6" }));
        let from_number = Draft::from_value(schema, json!({ "warn_threshold": 6 }));
        let from_float = Draft::from_value(schema, json!({ "warn_threshold": 6.0 }));
        assert_eq!(from_string.get("warn_threshold"), from_number.get("warn_threshold"));
        assert_eq!(from_float.get("warn_threshold"), from_number.get("warn_threshold"));
    }

    #[test]
    fn items_are_sorted_by_consumable() {
        let a = receipt_draft(json!({
            "items": [
                { "consumable": "consumable:b", "quantity": 1, "unit_price": 2.0, "unit": "pcs" },
                { "consumable": "consumable:a", "quantity": 5, "unit_price": 10, "unit": "pcs" },
            ]
        }));
        let b = receipt_draft(json!({
            "items": [
                { "consumable": "consumable:a", "quantity": 5, "unit_price": 10, "unit": "pcs" },
                { "consumable": "consumable:b", "quantity": 1, "unit_price": 2, "unit": "pcs" },
            ]
        }));
        assert_eq!(a.serialize(), b.serialize());
    }

    #[test]
    fn optional_text_empty_string_equals_null() {
        let schema = schema_for("receipt").unwrap();
        let spec = schema.field("note").unwrap();
        let with_empty = receipt_draft(json!({ "note": "" }));
        let with_null = receipt_draft(json!({ "note": null }));
        assert_eq!(canonical_string(&spec.kind, with_empty.get("note")), None);
        assert_eq!(canonical_string(&spec.kind, with_null.get("note")), None);
    }

    #[test]
    fn line_items_round_trip() {
        let draft = receipt_draft(json!({
            "items": [
                { "consumable": "consumable:a", "quantity": 5, "unit_price": 10.0, "unit": "pcs" },
            ]
        }));
        let items = draft.line_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
        assert_eq!(items[0].consumable, "consumable:a");
    }

    #[test]
    fn serialize_is_deterministic() {
        let make = || {
            receipt_draft(json!({
                "receipt_no": "R-9",
                "supplier": "ACME",
                "received_at": "2026-03-02",
                "items": [
                    { "consumable": "consumable:a", "quantity": 5, "unit_price": 10, "unit": "pcs" },
                ],
            }))
        };
        assert_eq!(make().serialize(), make().serialize());
    }
}
