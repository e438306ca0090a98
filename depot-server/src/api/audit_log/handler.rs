//! Audit Log API Handlers
//!
//! The global audit browser is itself a history-reading surface, so it sits
//! behind the same step-up gate as per-record history.

use axum::{Extension, Json, extract::State};
use serde::Deserialize;

use crate::api::payload::HistoryRequest;
use crate::audit::{AuditChainVerification, AuditListResponse, AuditQuery};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::mutation::gate::{self, SensitiveAction};
use crate::utils::{AppError, AppResult};

/// Query payload: step-up credential + filters
#[derive(Debug, Deserialize)]
pub struct AuditLogRequest {
    pub password: String,
    #[serde(flatten)]
    pub query: AuditQuery,
}

/// POST /api/audit-log/query — 查询审计日志
pub async fn query(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<AuditLogRequest>,
) -> AppResult<Json<AuditListResponse>> {
    gate::authorize(
        state.accounts(),
        SensitiveAction::ViewHistory,
        &user.id,
        &user.display_name,
        &req.password,
        None,
    )
    .await?;

    let (items, total) = state.audit().query(&req.query).await.map_err(AppError::from)?;
    Ok(Json(AuditListResponse { items, total }))
}

/// POST /api/audit-log/verify — 验证审计链完整性
pub async fn verify_chain(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<HistoryRequest>,
) -> AppResult<Json<AuditChainVerification>> {
    gate::authorize(
        state.accounts(),
        SensitiveAction::ViewHistory,
        &user.id,
        &user.display_name,
        &req.password,
        None,
    )
    .await?;

    let verification = state.audit().verify_chain().await.map_err(AppError::from)?;
    Ok(Json(verification))
}
