//! 审计日志服务
//!
//! `AuditService` 是审计日志的薄门面：
//! - 变更写入（同步 append — 审计行写入尝试完成之前不向调用方报告成功）
//! - 日志查询（直接读取 storage）
//! - 链验证
//!
//! 写入失败不会回滚已提交的业务变更；错误以独立的
//! `AuditWriteFailed` 类型上抛，由调用方告知操作人。

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::storage::{AuditStorage, AuditStorageError};
use super::types::*;

/// 审计日志服务
#[derive(Clone)]
pub struct AuditService {
    storage: AuditStorage,
}

impl AuditService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            storage: AuditStorage::new(db),
        }
    }

    /// 记录一次变更（每个 FieldChange 一行，同一批次共享时间戳与理由）
    pub async fn record_mutation(
        &self,
        table_name: &str,
        record_id: &str,
        action: AuditAction,
        changes: &[FieldChange],
        changed_by: &str,
        reason: &str,
    ) -> Result<Vec<AuditEntry>, AuditStorageError> {
        let entries = self
            .storage
            .append_batch(table_name, record_id, action, changes, changed_by, reason)
            .await?;

        for entry in &entries {
            tracing::debug!(
                audit_id = entry.id,
                action = %entry.action,
                table = %entry.table_name,
                field = %entry.field_name,
                "Audit entry recorded"
            );
        }

        Ok(entries)
    }

    /// 查询审计日志
    pub async fn query(&self, q: &AuditQuery) -> Result<(Vec<AuditEntry>, u64), AuditStorageError> {
        self.storage.query(q).await
    }

    /// 验证审计链完整性
    pub async fn verify_chain(&self) -> Result<AuditChainVerification, AuditStorageError> {
        self.storage.verify_chain().await
    }

    /// 获取存储引用
    pub fn storage(&self) -> &AuditStorage {
        &self.storage
    }
}
