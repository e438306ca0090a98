//! 实体字段表
//!
//! 每个可审计实体声明一张有序字段表：字段名、类型、展示标签。
//! 字段表一次声明，驱动三件事：
//! - Draft 规范化（缺失字段补 Null、列表字段排序）
//! - diff 的字段比较顺序（声明顺序，而非输入顺序）
//! - 历史记录的值格式化
//!
//! 凭证字段（hash_pass）不在任何字段表中，因此永远不会被
//! diff、写入审计日志或展示。

/// 字段类型，决定规范化、比较与格式化方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 文本；`optional` 为 true 时 Null 与空串视为等价
    Text { optional: bool },
    /// 整数
    Integer,
    /// 金额（两位小数展示）
    Currency,
    /// ISO 日期字符串
    Date,
    /// 布尔
    Bool,
    /// 枚举，(存储值, 展示标签) 对照表
    Enum(&'static [(&'static str, &'static str)]),
    /// 行项目列表（按 consumable 排序，整体作为单字段比较）
    Items,
    /// 更换配件列表（按名称排序，整体作为单字段比较）
    Parts,
}

/// 单个字段的声明
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

/// 实体的声明式 schema
#[derive(Debug)]
pub struct EntitySchema {
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
    /// 行项目对库存的方向：入库 +1，出库 -1，无库存影响 None
    pub stock_direction: Option<i64>,
}

impl EntitySchema {
    /// Look up a declared field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

const EQUIPMENT_STATUS: &[(&str, &str)] = &[
    ("in_service", "In service"),
    ("on_loan", "On loan"),
    ("under_maintenance", "Under maintenance"),
    ("retired", "Retired"),
];

const MAINTENANCE_STATUS: &[(&str, &str)] = &[
    ("open", "Open"),
    ("in_repair", "In repair"),
    ("completed", "Completed"),
];

const LOAN_STATUS: &[(&str, &str)] = &[("out", "Out"), ("returned", "Returned")];

const ACCOUNT_ROLE: &[(&str, &str)] = &[
    ("admin", "Administrator"),
    ("manager", "Manager"),
    ("staff", "Staff"),
];

static RECEIPT: EntitySchema = EntitySchema {
    table: "receipt",
    fields: &[
        FieldSpec { name: "receipt_no", label: "Receipt no.", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "supplier", label: "Supplier", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "received_at", label: "Received", kind: FieldKind::Date },
        FieldSpec { name: "items", label: "Items", kind: FieldKind::Items },
        FieldSpec { name: "note", label: "Note", kind: FieldKind::Text { optional: true } },
    ],
    stock_direction: Some(1),
};

static CONSUMPTION: EntitySchema = EntitySchema {
    table: "consumption",
    fields: &[
        FieldSpec { name: "department", label: "Department", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "issued_to", label: "Issued to", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "issued_at", label: "Issued", kind: FieldKind::Date },
        FieldSpec { name: "items", label: "Items", kind: FieldKind::Items },
        FieldSpec { name: "note", label: "Note", kind: FieldKind::Text { optional: true } },
    ],
    stock_direction: Some(-1),
};

static EQUIPMENT: EntitySchema = EntitySchema {
    table: "equipment",
    fields: &[
        FieldSpec { name: "asset_tag", label: "Asset tag", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "name", label: "Name", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "model", label: "Model", kind: FieldKind::Text { optional: true } },
        FieldSpec { name: "serial_no", label: "Serial no.", kind: FieldKind::Text { optional: true } },
        FieldSpec { name: "location", label: "Location", kind: FieldKind::Text { optional: true } },
        FieldSpec { name: "status", label: "Status", kind: FieldKind::Enum(EQUIPMENT_STATUS) },
        FieldSpec { name: "purchased_at", label: "Purchased", kind: FieldKind::Date },
        FieldSpec { name: "purchase_price", label: "Purchase price", kind: FieldKind::Currency },
        FieldSpec { name: "note", label: "Note", kind: FieldKind::Text { optional: true } },
    ],
    stock_direction: None,
};

static CONSUMABLE: EntitySchema = EntitySchema {
    table: "consumable",
    // stock_quantity 由库存台账维护，不参与 diff/审计
    fields: &[
        FieldSpec { name: "name", label: "Name", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "model", label: "Model", kind: FieldKind::Text { optional: true } },
        FieldSpec { name: "unit", label: "Unit", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "warn_threshold", label: "Warn threshold", kind: FieldKind::Integer },
    ],
    stock_direction: None,
};

static MAINTENANCE: EntitySchema = EntitySchema {
    table: "maintenance",
    fields: &[
        FieldSpec { name: "equipment", label: "Equipment", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "reported_by", label: "Reported by", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "fault_desc", label: "Fault", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "status", label: "Status", kind: FieldKind::Enum(MAINTENANCE_STATUS) },
        FieldSpec { name: "parts_replaced", label: "Parts replaced", kind: FieldKind::Parts },
        FieldSpec { name: "cost", label: "Cost", kind: FieldKind::Currency },
        FieldSpec { name: "completed_at", label: "Completed", kind: FieldKind::Date },
    ],
    stock_direction: None,
};

static LOAN: EntitySchema = EntitySchema {
    table: "loan",
    fields: &[
        FieldSpec { name: "equipment", label: "Equipment", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "borrower", label: "Borrower", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "borrowed_at", label: "Borrowed", kind: FieldKind::Date },
        FieldSpec { name: "due_at", label: "Due", kind: FieldKind::Date },
        FieldSpec { name: "returned_at", label: "Returned", kind: FieldKind::Date },
        FieldSpec { name: "status", label: "Status", kind: FieldKind::Enum(LOAN_STATUS) },
        FieldSpec { name: "note", label: "Note", kind: FieldKind::Text { optional: true } },
    ],
    stock_direction: None,
};

static ACCOUNT: EntitySchema = EntitySchema {
    table: "account",
    fields: &[
        FieldSpec { name: "username", label: "Username", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "display_name", label: "Display name", kind: FieldKind::Text { optional: false } },
        FieldSpec { name: "role", label: "Role", kind: FieldKind::Enum(ACCOUNT_ROLE) },
        FieldSpec { name: "is_system", label: "System account", kind: FieldKind::Bool },
        FieldSpec { name: "is_active", label: "Active", kind: FieldKind::Bool },
    ],
    stock_direction: None,
};

/// 按表名查找实体 schema
pub fn schema_for(table: &str) -> Option<&'static EntitySchema> {
    match table {
        "receipt" => Some(&RECEIPT),
        "consumption" => Some(&CONSUMPTION),
        "equipment" => Some(&EQUIPMENT),
        "consumable" => Some(&CONSUMABLE),
        "maintenance" => Some(&MAINTENANCE),
        "loan" => Some(&LOAN),
        "account" => Some(&ACCOUNT),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_resolves() {
        for table in [
            "receipt",
            "consumption",
            "equipment",
            "consumable",
            "maintenance",
            "loan",
            "account",
        ] {
            let schema = schema_for(table).unwrap();
            assert_eq!(schema.table, table);
            assert!(!schema.fields.is_empty());
        }
        assert!(schema_for("order").is_none());
    }

    #[test]
    fn stock_directions() {
        assert_eq!(schema_for("receipt").unwrap().stock_direction, Some(1));
        assert_eq!(schema_for("consumption").unwrap().stock_direction, Some(-1));
        assert_eq!(schema_for("equipment").unwrap().stock_direction, None);
    }

    #[test]
    fn credential_material_is_not_declared() {
        assert!(schema_for("account").unwrap().field("hash_pass").is_none());
    }
}
