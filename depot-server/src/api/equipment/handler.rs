//! Equipment API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::payload::{ActionRequest, HistoryRequest, Sensitive};
use crate::api::records;
use crate::audit::HistoryEntry;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Equipment, EquipmentCreate, EquipmentUpdate};
use crate::db::repository::EquipmentRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const TABLE: &str = "equipment";

fn validate_equipment(unit: &Equipment) -> AppResult<()> {
    validate_required_text(&unit.asset_tag, "asset_tag", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&unit.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&unit.model, "model", MAX_NAME_LEN)?;
    validate_optional_text(&unit.serial_no, "serial_no", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&unit.location, "location", MAX_NAME_LEN)?;
    validate_optional_text(&unit.note, "note", MAX_NOTE_LEN)?;
    if unit.purchase_price.is_some_and(|p| p.is_sign_negative()) {
        return Err(AppError::validation("purchase_price must not be negative"));
    }
    Ok(())
}

/// Reject a duplicate asset tag before the mutation reaches the engine
async fn check_asset_tag(
    repo: &EquipmentRepository,
    asset_tag: &str,
    own_id: Option<&str>,
) -> AppResult<()> {
    if let Some(existing) = repo.find_by_asset_tag(asset_tag).await.map_err(AppError::from)? {
        let existing_id = existing.id.as_ref().map(|t| t.to_string());
        if existing_id.as_deref() != own_id {
            return Err(AppError::new(ErrorCode::AssetTagExists));
        }
    }
    Ok(())
}

/// List all equipment
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Equipment>>> {
    let repo = EquipmentRepository::new(state.db().clone());
    let units = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(units))
}

/// Get equipment by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Equipment>> {
    let repo = EquipmentRepository::new(state.db().clone());
    let unit = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;
    Ok(Json(unit))
}

/// Register equipment (step-up: password + reason)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<Sensitive<EquipmentCreate>>,
) -> AppResult<Json<Equipment>> {
    let unit = Equipment::from_create(req.data);
    validate_equipment(&unit)?;

    let repo = EquipmentRepository::new(state.db().clone());
    check_asset_tag(&repo, &unit.asset_tag, None).await?;

    let outcome =
        records::submit_create(&state, &user, TABLE, &unit, &req.password, &req.reason).await?;

    let created = repo
        .find_by_id(&outcome.record_id.to_string())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::internal("Created equipment not readable"))?;
    Ok(Json(created))
}

/// Update equipment (step-up: password + reason)
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<Sensitive<EquipmentUpdate>>,
) -> AppResult<Json<Equipment>> {
    let repo = EquipmentRepository::new(state.db().clone());
    let before = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;

    let after = before.apply_update(req.data);
    validate_equipment(&after)?;
    check_asset_tag(&repo, &after.asset_tag, before.id.as_ref().map(|t| t.to_string()).as_deref())
        .await?;

    records::submit_update(&state, &user, TABLE, &id, &before, &after, &req.password, &req.reason)
        .await?;

    let updated = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;
    Ok(Json(updated))
}

/// Retire equipment from the registry (step-up: password + reason)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<ActionRequest>,
) -> AppResult<Json<bool>> {
    let repo = EquipmentRepository::new(state.db().clone());
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

/// Audit history for an equipment unit (step-up: password only)
pub async fn history(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<HistoryRequest>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let entries = records::fetch_history(&state, &user, TABLE, &id, &req.password).await?;
    Ok(Json(entries))
}
