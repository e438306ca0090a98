//! 审计日志类型定义
//!
//! 审计日志的核心数据结构。所有条目不可变、不可删除，
//! 支持 SHA256 哈希链防篡改。

use serde::{Deserialize, Serialize};

/// 整条记录创建/删除时使用的哨兵字段名
pub const ENTIRE_RECORD: &str = "entire_record";

/// 审计操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Insert,
    Update,
    Delete,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AuditAction::Insert => "INSERT",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
        };
        write!(f, "{s}")
    }
}

/// 单个字段的前后值变更
///
/// `old_value`/`new_value` 均为规范化字符串；两者不会同时为 None
/// （无变化的字段不会产生 FieldChange）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// 审计日志条目（不可变）
///
/// 每条记录包含 SHA256 哈希链，确保防篡改。
/// - `prev_hash`: 前一条记录的哈希
/// - `curr_hash`: 当前记录的哈希（包含 prev_hash + 所有字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// 全局递增序列号（唯一标识）
    pub id: u64,
    /// 业务表名（如 "receipt", "equipment"）
    pub table_name: String,
    /// 记录 ID（表内主键）
    pub record_id: String,
    /// 操作类型
    pub action: AuditAction,
    /// 字段名，整条记录变更时为 `entire_record`
    pub field_name: String,
    /// 变更前的值（INSERT 为 None）
    pub old_value: Option<String>,
    /// 变更后的值（DELETE 为 None）
    pub new_value: Option<String>,
    /// 操作人账号 ID
    pub changed_by: String,
    /// 操作理由（自由文本，原样存储）
    pub reason: String,
    /// 时间戳（Unix 毫秒）
    pub changed_at: i64,
    /// 前一条审计日志哈希
    pub prev_hash: String,
    /// 当前记录哈希（SHA256）
    pub curr_hash: String,
}

/// 审计日志查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuery {
    /// 业务表名过滤
    pub table_name: Option<String>,
    /// 记录 ID 过滤
    pub record_id: Option<String>,
    /// 操作类型过滤
    pub action: Option<AuditAction>,
    /// 操作人过滤
    pub changed_by: Option<String>,
    /// 起始时间（Unix 毫秒，含）
    pub from: Option<i64>,
    /// 截止时间（Unix 毫秒，含）
    pub to: Option<i64>,
    /// 分页偏移
    #[serde(default)]
    pub offset: usize,
    /// 分页大小（默认 50）
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            table_name: None,
            record_id: None,
            action: None,
            changed_by: None,
            from: None,
            to: None,
            offset: 0,
            limit: default_limit(),
        }
    }
}

/// 审计日志列表响应
#[derive(Debug, Serialize)]
pub struct AuditListResponse {
    pub items: Vec<AuditEntry>,
    pub total: u64,
}

/// 审计链验证结果
#[derive(Debug, Serialize)]
pub struct AuditChainVerification {
    /// 验证的记录总数
    pub total_entries: u64,
    /// 链是否完整
    pub chain_intact: bool,
    /// 断裂点列表
    pub breaks: Vec<AuditChainBreak>,
}

/// 审计链断裂点
#[derive(Debug, Serialize)]
pub struct AuditChainBreak {
    /// 断裂处的序列号
    pub entry_id: u64,
    /// 期望的哈希
    pub expected: String,
    /// 实际存储的哈希
    pub actual: String,
}
