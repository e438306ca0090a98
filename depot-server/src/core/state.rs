use std::path::Path;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::audit::{AuditService, HistoryService};
use crate::auth::JwtService;
use crate::core::Config;
use crate::db::repository::AccountRepository;
use crate::mutation::MutationEngine;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是服务端的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Arc<Config> | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt | Arc<JwtService> | JWT 认证服务 |
/// | audit | Arc<AuditService> | 审计日志服务 |
/// | engine | Arc<MutationEngine> | 审计化变更引擎 |
/// | history | Arc<HistoryService> | 审计历史服务 |
#[derive(Clone)]
pub struct ServerState {
    config: Arc<Config>,
    db: Surreal<Db>,
    jwt: Arc<JwtService>,
    audit: Arc<AuditService>,
    engine: Arc<MutationEngine>,
    history: Arc<HistoryService>,
}

impl ServerState {
    /// 初始化服务器状态：打开数据库、应用 schema、补种系统管理员
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let work_dir = Path::new(&config.work_dir);
        std::fs::create_dir_all(work_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db = crate::db::open(work_dir).await?;
        Self::with_db(config, db).await
    }

    /// 基于已打开的数据库构建状态（测试用内存库也走这里）
    pub async fn with_db(config: &Config, db: Surreal<Db>) -> Result<Self, AppError> {
        AccountRepository::new(db.clone())
            .ensure_system_admin(&config.admin_password)
            .await?;

        Ok(Self {
            config: Arc::new(config.clone()),
            jwt: Arc::new(JwtService::new(config.jwt.clone())),
            audit: Arc::new(AuditService::new(db.clone())),
            engine: Arc::new(MutationEngine::new(db.clone())),
            history: Arc::new(HistoryService::new(db.clone())),
            db,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt
    }

    pub fn audit(&self) -> &AuditService {
        &self.audit
    }

    pub fn engine(&self) -> &MutationEngine {
        &self.engine
    }

    pub fn history(&self) -> &HistoryService {
        &self.history
    }

    /// 账号仓库（同时充当 step-up gate 的凭证校验器）
    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.db.clone())
    }
}
