//! Consumable API Handlers
//!
//! `stock_quantity` is read-only here: it only moves through receipt and
//! consumption mutations via the inventory ledger.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::payload::{ActionRequest, HistoryRequest, Sensitive};
use crate::api::records;
use crate::audit::HistoryEntry;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Consumable, ConsumableCreate, ConsumableUpdate};
use crate::db::repository::ConsumableRepository;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};

const TABLE: &str = "consumable";

fn validate_consumable(sku: &Consumable) -> AppResult<()> {
    validate_required_text(&sku.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&sku.model, "model", MAX_NAME_LEN)?;
    validate_required_text(&sku.unit, "unit", MAX_SHORT_TEXT_LEN)?;
    if sku.warn_threshold < 0 {
        return Err(AppError::validation("warn_threshold must not be negative"));
    }
    Ok(())
}

/// List all consumables with current stock
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Consumable>>> {
    let repo = ConsumableRepository::new(state.db().clone());
    let skus = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(skus))
}

/// Consumables at or below their warn threshold (over-issuance shows as
/// negative stock and sorts first)
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<Json<Vec<Consumable>>> {
    let repo = ConsumableRepository::new(state.db().clone());
    let skus = repo.find_low_stock().await.map_err(AppError::from)?;
    Ok(Json(skus))
}

/// Get consumable by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Consumable>> {
    let repo = ConsumableRepository::new(state.db().clone());
    let sku = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;
    Ok(Json(sku))
}

/// Create a consumable SKU (step-up: password + reason)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<Sensitive<ConsumableCreate>>,
) -> AppResult<Json<Consumable>> {
    let sku = Consumable {
        id: None,
        name: req.data.name,
        model: req.data.model,
        unit: req.data.unit,
        stock_quantity: 0,
        warn_threshold: req.data.warn_threshold,
    };
    validate_consumable(&sku)?;

    let outcome =
        records::submit_create(&state, &user, TABLE, &sku, &req.password, &req.reason).await?;

    let repo = ConsumableRepository::new(state.db().clone());
    let created = repo
        .find_by_id(&outcome.record_id.to_string())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::internal("Created consumable not readable"))?;
    Ok(Json(created))
}

/// Update a consumable SKU (step-up: password + reason)
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<Sensitive<ConsumableUpdate>>,
) -> AppResult<Json<Consumable>> {
    let repo = ConsumableRepository::new(state.db().clone());
    let before = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;

    let after = before.apply_update(req.data);
    validate_consumable(&after)?;

    records::submit_update(&state, &user, TABLE, &id, &before, &after, &req.password, &req.reason)
        .await?;

    let updated = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;
    Ok(Json(updated))
}

/// Delete a consumable SKU (step-up: password + reason)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<ActionRequest>,
) -> AppResult<Json<bool>> {
    let repo = ConsumableRepository::new(state.db().clone());
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

/// Audit history for a consumable (step-up: password only)
pub async fn history(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<HistoryRequest>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let entries = records::fetch_history(&state, &user, TABLE, &id, &req.password).await?;
    Ok(Json(entries))
}
