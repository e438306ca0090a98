//! Receipt API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::payload::{ActionRequest, HistoryRequest, Sensitive};
use crate::api::records;
use crate::audit::HistoryEntry;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Receipt, ReceiptCreate, ReceiptUpdate};
use crate::db::repository::ReceiptRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_line_items, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

const TABLE: &str = "receipt";

fn validate_receipt(receipt: &Receipt) -> AppResult<()> {
    validate_required_text(&receipt.receipt_no, "receipt_no", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&receipt.supplier, "supplier", MAX_NAME_LEN)?;
    validate_required_text(&receipt.received_at, "received_at", MAX_SHORT_TEXT_LEN)?;
    validate_line_items(&receipt.items)?;
    validate_optional_text(&receipt.note, "note", MAX_NOTE_LEN)?;
    Ok(())
}

/// List all receipts
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Receipt>>> {
    let repo = ReceiptRepository::new(state.db().clone());
    let receipts = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(receipts))
}

/// Get receipt by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Receipt>> {
    let repo = ReceiptRepository::new(state.db().clone());
    let receipt = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;
    Ok(Json(receipt))
}

/// Create a receipt (step-up: password + reason)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<Sensitive<ReceiptCreate>>,
) -> AppResult<Json<Receipt>> {
    let receipt = Receipt::from_create(req.data);
    validate_receipt(&receipt)?;

    let outcome =
        records::submit_create(&state, &user, TABLE, &receipt, &req.password, &req.reason).await?;

    let repo = ReceiptRepository::new(state.db().clone());
    let created = repo
        .find_by_id(&outcome.record_id.to_string())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::internal("Created receipt not readable"))?;
    Ok(Json(created))
}

/// Update a receipt (step-up: password + reason)
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<Sensitive<ReceiptUpdate>>,
) -> AppResult<Json<Receipt>> {
    let repo = ReceiptRepository::new(state.db().clone());
    let before = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;

    let after = before.apply_update(req.data);
    validate_receipt(&after)?;

    records::submit_update(&state, &user, TABLE, &id, &before, &after, &req.password, &req.reason)
        .await?;

    let updated = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;
    Ok(Json(updated))
}

/// Delete a receipt (step-up: password + reason)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<ActionRequest>,
) -> AppResult<Json<bool>> {
    let repo = ReceiptRepository::new(state.db().clone());
    let before = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;

    records::submit_delete(
        &state,
        &user,
        TABLE,
        &id,
        &before,
        &req.password,
        req.reason.as_deref().unwrap_or_default(),
    )
    .await?;
    Ok(Json(true))
}

/// Audit history for a receipt (step-up: password only)
pub async fn history(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<HistoryRequest>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let entries = records::fetch_history(&state, &user, TABLE, &id, &req.password).await?;
    Ok(Json(entries))
}
