//! 审计日志 SurrealDB 存储层
//!
//! Append-only 设计，没有任何删除/更新接口。
//! SHA256 哈希链确保防篡改。

use std::sync::Arc;

use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use super::types::{
    AuditAction, AuditChainBreak, AuditChainVerification, AuditEntry, AuditQuery, FieldChange,
};

/// 存储错误
#[derive(Debug, Error)]
pub enum AuditStorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<surrealdb::Error> for AuditStorageError {
    fn from(err: surrealdb::Error) -> Self {
        AuditStorageError::Database(err.to_string())
    }
}

pub type AuditStorageResult<T> = Result<T, AuditStorageError>;

impl From<AuditStorageError> for shared::error::AppError {
    fn from(err: AuditStorageError) -> Self {
        shared::error::AppError::with_message(shared::error::ErrorCode::AuditQueryFailed, err.to_string())
    }
}

/// SurrealDB 反序列化用（包含 SurrealDB record id）
#[derive(Debug, Clone, serde::Deserialize)]
struct AuditRecord {
    #[allow(dead_code)]
    id: surrealdb::RecordId,
    sequence: u64,
    table_name: String,
    record_id: String,
    action: AuditAction,
    field_name: String,
    old_value: Option<String>,
    new_value: Option<String>,
    changed_by: String,
    reason: String,
    changed_at: i64,
    prev_hash: String,
    curr_hash: String,
}

impl From<AuditRecord> for AuditEntry {
    fn from(r: AuditRecord) -> Self {
        AuditEntry {
            id: r.sequence,
            table_name: r.table_name,
            record_id: r.record_id,
            action: r.action,
            field_name: r.field_name,
            old_value: r.old_value,
            new_value: r.new_value,
            changed_by: r.changed_by,
            reason: r.reason,
            changed_at: r.changed_at,
            prev_hash: r.prev_hash,
            curr_hash: r.curr_hash,
        }
    }
}

/// 查询最后一条记录的序列号和哈希
#[derive(Debug, serde::Deserialize)]
struct LastEntry {
    sequence: u64,
    curr_hash: String,
}

/// COUNT 结果
#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}

/// 插入用结构（不含 SurrealDB id）
#[derive(Debug, serde::Serialize)]
struct AuditInsert {
    sequence: u64,
    table_name: String,
    record_id: String,
    action: AuditAction,
    field_name: String,
    old_value: Option<String>,
    new_value: Option<String>,
    changed_by: String,
    reason: String,
    changed_at: i64,
    prev_hash: String,
    curr_hash: String,
}

/// 审计日志存储 (SurrealDB)
///
/// Append-only 设计：
/// - 仅提供 `append_batch` 和查询方法
/// - 没有 delete/update 接口
/// - SHA256 哈希链确保完整性
#[derive(Clone)]
pub struct AuditStorage {
    db: Surreal<Db>,
    /// 序列化所有 append 操作，防止 sequence/哈希链的 read-modify-write 竞争
    append_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AuditStorage {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            db,
            append_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// 追加一次变更的全部审计行（每个 FieldChange 一行）
    ///
    /// 1. 查询当前最大序列号和 last_hash
    /// 2. 批内逐行递增序列号、延伸哈希链
    /// 3. 逐行写入
    pub async fn append_batch(
        &self,
        table_name: &str,
        record_id: &str,
        action: AuditAction,
        changes: &[FieldChange],
        changed_by: &str,
        reason: &str,
    ) -> AuditStorageResult<Vec<AuditEntry>> {
        if changes.is_empty() {
            return Ok(Vec::new());
        }

        // 序列化：防止并发 append 导致 sequence/链冲突
        let _guard = self.append_lock.lock().await;

        // 1. 读取当前最大序列号和 last_hash
        let mut result = self
            .db
            .query("SELECT sequence, curr_hash FROM audit_log ORDER BY sequence DESC LIMIT 1")
            .await?;
        let last: Vec<LastEntry> = result.take(0)?;

        let (mut sequence, mut prev_hash) = match last.first() {
            Some(last) => (last.sequence + 1, last.curr_hash.clone()),
            None => (1, "genesis".to_string()),
        };

        let changed_at = shared::util::now_millis();
        let mut entries = Vec::with_capacity(changes.len());

        for change in changes {
            // 2. 计算哈希（所有存储字段参与）
            let curr_hash = compute_audit_hash(
                &prev_hash,
                sequence,
                changed_at,
                &action,
                table_name,
                record_id,
                &change.field,
                change.old_value.as_deref(),
                change.new_value.as_deref(),
                changed_by,
                reason,
            );

            let insert = AuditInsert {
                sequence,
                table_name: table_name.to_string(),
                record_id: record_id.to_string(),
                action,
                field_name: change.field.clone(),
                old_value: change.old_value.clone(),
                new_value: change.new_value.clone(),
                changed_by: changed_by.to_string(),
                reason: reason.to_string(),
                changed_at,
                prev_hash: prev_hash.clone(),
                curr_hash: curr_hash.clone(),
            };

            // 3. 写入 SurrealDB（bind 需要 'static，传 owned）
            let mut res = self
                .db
                .query("CREATE audit_log CONTENT $data")
                .bind(("data", insert))
                .await?;
            let _: Vec<AuditRecord> = res.take(0)?;

            entries.push(AuditEntry {
                id: sequence,
                table_name: table_name.to_string(),
                record_id: record_id.to_string(),
                action,
                field_name: change.field.clone(),
                old_value: change.old_value.clone(),
                new_value: change.new_value.clone(),
                changed_by: changed_by.to_string(),
                reason: reason.to_string(),
                changed_at,
                prev_hash: prev_hash.clone(),
                curr_hash: curr_hash.clone(),
            });

            prev_hash = curr_hash;
            sequence += 1;
        }

        Ok(entries)
    }

    /// 查询审计日志（过滤 + 分页）
    pub async fn query(&self, q: &AuditQuery) -> AuditStorageResult<(Vec<AuditEntry>, u64)> {
        let mut conditions = Vec::new();

        if q.table_name.is_some() {
            conditions.push("table_name = $table_name");
        }
        if q.record_id.is_some() {
            conditions.push("record_id = $record_id");
        }
        if q.action.is_some() {
            conditions.push("action = $action");
        }
        if q.changed_by.is_some() {
            conditions.push("changed_by = $changed_by");
        }
        if q.from.is_some() {
            conditions.push("changed_at >= $from");
        }
        if q.to.is_some() {
            conditions.push("changed_at <= $to");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!(
            "SELECT count() as total FROM audit_log{} GROUP ALL",
            where_clause
        );
        let select_sql = format!(
            "SELECT * FROM audit_log{} ORDER BY sequence DESC LIMIT {} START {}",
            where_clause, q.limit, q.offset
        );
        let sql = format!("{}; {}", count_sql, select_sql);

        let mut qb = self.db.query(&sql);

        if let Some(ref table_name) = q.table_name {
            qb = qb.bind(("table_name", table_name.clone()));
        }
        if let Some(ref record_id) = q.record_id {
            qb = qb.bind(("record_id", record_id.clone()));
        }
        if let Some(ref action) = q.action {
            let action_str = serde_json::to_value(action)?
                .as_str()
                .unwrap_or_default()
                .to_string();
            qb = qb.bind(("action", action_str));
        }
        if let Some(ref changed_by) = q.changed_by {
            qb = qb.bind(("changed_by", changed_by.clone()));
        }
        if let Some(from) = q.from {
            qb = qb.bind(("from", from));
        }
        if let Some(to) = q.to {
            qb = qb.bind(("to", to));
        }

        let mut result = qb.await?;

        let count_result: Vec<CountResult> = result.take(0)?;
        let total = count_result.first().map(|c| c.total).unwrap_or(0);

        let records: Vec<AuditRecord> = result.take(1)?;
        let entries = records.into_iter().map(AuditEntry::from).collect();

        Ok((entries, total))
    }

    /// 查询单条记录的全部审计行（时间倒序）
    pub async fn query_for_record(
        &self,
        table_name: &str,
        record_id: &str,
    ) -> AuditStorageResult<Vec<AuditEntry>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM audit_log \
                 WHERE table_name = $table_name AND record_id = $record_id \
                 ORDER BY sequence DESC",
            )
            .bind(("table_name", table_name.to_string()))
            .bind(("record_id", record_id.to_string()))
            .await?;

        let records: Vec<AuditRecord> = result.take(0)?;
        Ok(records.into_iter().map(AuditEntry::from).collect())
    }

    /// 验证审计链完整性（全链，从 genesis 开始重算）
    pub async fn verify_chain(&self) -> AuditStorageResult<AuditChainVerification> {
        let mut result = self
            .db
            .query("SELECT * FROM audit_log ORDER BY sequence ASC")
            .await?;
        let records: Vec<AuditRecord> = result.take(0)?;

        let mut breaks = Vec::new();
        let mut expected_prev = "genesis".to_string();

        for r in &records {
            if r.prev_hash != expected_prev {
                breaks.push(AuditChainBreak {
                    entry_id: r.sequence,
                    expected: expected_prev.clone(),
                    actual: r.prev_hash.clone(),
                });
            }

            let recomputed = compute_audit_hash(
                &r.prev_hash,
                r.sequence,
                r.changed_at,
                &r.action,
                &r.table_name,
                &r.record_id,
                &r.field_name,
                r.old_value.as_deref(),
                r.new_value.as_deref(),
                &r.changed_by,
                &r.reason,
            );
            if recomputed != r.curr_hash {
                breaks.push(AuditChainBreak {
                    entry_id: r.sequence,
                    expected: recomputed,
                    actual: r.curr_hash.clone(),
                });
            }

            expected_prev = r.curr_hash.clone();
        }

        Ok(AuditChainVerification {
            total_entries: records.len() as u64,
            chain_intact: breaks.is_empty(),
            breaks,
        })
    }
}

/// 计算审计行的 SHA256 哈希
///
/// 所有存储字段参与哈希，任何修改都会导致不匹配。
///
/// 设计要点：
/// - 变长字段间用 `\x00` 分隔，防止 `("ab","cd")` 与 `("abc","d")` 碰撞
/// - 定长字段（u64/i64）用 LE 字节序，无需分隔
/// - Optional 字段用 `\x00`=None / `\x01`+bytes=Some 区分，避免 None 与 Some("") 碰撞
/// - action 使用 serde 序列化（UPPERCASE，跨版本稳定），而非 Debug trait
#[allow(clippy::too_many_arguments)]
fn compute_audit_hash(
    prev_hash: &str,
    sequence: u64,
    changed_at: i64,
    action: &AuditAction,
    table_name: &str,
    record_id: &str,
    field_name: &str,
    old_value: Option<&str>,
    new_value: Option<&str>,
    changed_by: &str,
    reason: &str,
) -> String {
    let mut hasher = Sha256::new();

    // 链接前一条哈希
    hasher.update(prev_hash.as_bytes());
    hasher.update(b"\x00");

    // 定长字段
    hasher.update(sequence.to_le_bytes());
    hasher.update(changed_at.to_le_bytes());

    // action — serde UPPERCASE (稳定格式，与 DB 存储一致)
    let action_str = serde_json::to_string(action).unwrap_or_default();
    hasher.update(action_str.as_bytes());
    hasher.update(b"\x00");

    // 变长字符串字段 — 分隔符隔离
    hasher.update(table_name.as_bytes());
    hasher.update(b"\x00");
    hasher.update(record_id.as_bytes());
    hasher.update(b"\x00");
    hasher.update(field_name.as_bytes());
    hasher.update(b"\x00");

    // Optional 字段 — tag byte 区分 None/Some
    hash_optional(&mut hasher, old_value);
    hash_optional(&mut hasher, new_value);

    hasher.update(changed_by.as_bytes());
    hasher.update(b"\x00");
    hasher.update(reason.as_bytes());
    hasher.update(b"\x00");

    format!("{:x}", hasher.finalize())
}

/// Optional 字段哈希：`\x00` = None, `\x01` + bytes + `\x00` = Some
fn hash_optional(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update(b"\x01");
            hasher.update(v.as_bytes());
        }
        None => {
            hasher.update(b"\x00");
        }
    }
    hasher.update(b"\x00");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_values_cannot_collide_with_empty_strings() {
        let a = compute_audit_hash(
            "genesis", 1, 0, &AuditAction::Update, "receipt", "1", "note", None, Some(""), "account:1", "r",
        );
        let b = compute_audit_hash(
            "genesis", 1, 0, &AuditAction::Update, "receipt", "1", "note", Some(""), None, "account:1", "r",
        );
        assert_ne!(a, b);
    }

    #[test]
    fn any_field_change_changes_the_hash() {
        let base = compute_audit_hash(
            "genesis", 1, 42, &AuditAction::Insert, "receipt", "1", "entire_record", None,
            Some("{}"), "account:1", "initial intake",
        );
        let other_reason = compute_audit_hash(
            "genesis", 1, 42, &AuditAction::Insert, "receipt", "1", "entire_record", None,
            Some("{}"), "account:1", "different reason",
        );
        let other_actor = compute_audit_hash(
            "genesis", 1, 42, &AuditAction::Insert, "receipt", "1", "entire_record", None,
            Some("{}"), "account:2", "initial intake",
        );
        assert_ne!(base, other_reason);
        assert_ne!(base, other_actor);
    }
}
