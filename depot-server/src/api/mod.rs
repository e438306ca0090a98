//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录与会话
//! - [`accounts`] - 账号管理接口
//! - [`equipment`] - 设备台账接口
//! - [`consumables`] - 耗材与库存接口
//! - [`receipts`] - 入库单接口
//! - [`consumptions`] - 领用单接口
//! - [`maintenance`] - 维修工单接口
//! - [`loans`] - 借还接口
//! - [`audit_log`] - 审计日志接口
//!
//! 所有变更端点走 step-up gate：请求体携带口令（与理由），
//! 由 handler 先行授权再进入变更引擎。

pub mod payload;
pub mod records;

pub mod accounts;
pub mod audit_log;
pub mod auth;
pub mod consumables;
pub mod consumptions;
pub mod equipment;
pub mod health;
pub mod loans;
pub mod maintenance;
pub mod receipts;

use axum::Router;

use crate::core::ServerState;

/// Assemble the full API router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(accounts::router())
        .merge(equipment::router())
        .merge(consumables::router())
        .merge(receipts::router())
        .merge(consumptions::router())
        .merge(maintenance::router())
        .merge(loans::router())
        .merge(audit_log::router())
        .with_state(state)
}
