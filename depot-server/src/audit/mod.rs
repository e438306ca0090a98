//! 审计日志模块 — 字段级变更追踪与防篡改审计
//!
//! # 架构
//!
//! ```text
//! 敏感操作 (gate 授权后)
//!   └─ MutationEngine
//!        ├─ Draft  (规范化快照，schema 定义字段顺序)
//!        ├─ diff   (before vs after → FieldChange 列表)
//!        └─ AuditService::record_mutation → AuditStorage (audit_log 表)
//!
//! SHA256 哈希链: genesis → entry₁ → entry₂ → ... → entryₙ
//! ```
//!
//! # 防篡改保证
//!
//! - **SHA256 哈希链**: 每条记录包含前一条的哈希
//! - **Append-only**: 无删除/更新接口
//! - **链验证 API**: 可随时验证完整性
//!
//! # 记录粒度
//!
//! 每次变更的每个字段一条记录；整条记录的创建/删除使用
//! `entire_record` 哨兵字段，值为规范化序列化快照。

pub mod diff;
pub mod draft;
pub mod history;
pub mod schema;
pub mod service;
pub mod storage;
pub mod types;

pub use diff::compute_changes;
pub use draft::Draft;
pub use history::{HistoryEntry, HistoryService};
pub use schema::{EntitySchema, FieldKind, FieldSpec, schema_for};
pub use service::AuditService;
pub use storage::{AuditStorage, AuditStorageError};
pub use types::{
    AuditAction, AuditChainBreak, AuditChainVerification, AuditEntry, AuditListResponse,
    AuditQuery, ENTIRE_RECORD, FieldChange,
};
