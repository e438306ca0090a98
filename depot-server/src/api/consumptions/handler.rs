//! Consumption API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::payload::{ActionRequest, HistoryRequest, Sensitive};
use crate::api::records;
use crate::audit::HistoryEntry;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Consumption, ConsumptionCreate, ConsumptionUpdate};
use crate::db::repository::ConsumptionRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_line_items, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

const TABLE: &str = "consumption";

fn validate_consumption(slip: &Consumption) -> AppResult<()> {
    validate_required_text(&slip.department, "department", MAX_NAME_LEN)?;
    validate_required_text(&slip.issued_to, "issued_to", MAX_NAME_LEN)?;
    validate_required_text(&slip.issued_at, "issued_at", MAX_SHORT_TEXT_LEN)?;
    validate_line_items(&slip.items)?;
    validate_optional_text(&slip.note, "note", MAX_NOTE_LEN)?;
    Ok(())
}

/// List all consumption slips
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Consumption>>> {
    let repo = ConsumptionRepository::new(state.db().clone());
    let slips = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(slips))
}

/// Get consumption slip by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Consumption>> {
    let repo = ConsumptionRepository::new(state.db().clone());
    let slip = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;
    Ok(Json(slip))
}

/// Create a consumption slip (step-up: password + reason)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<Sensitive<ConsumptionCreate>>,
) -> AppResult<Json<Consumption>> {
    let slip = Consumption::from_create(req.data);
    validate_consumption(&slip)?;

    let outcome =
        records::submit_create(&state, &user, TABLE, &slip, &req.password, &req.reason).await?;

    let repo = ConsumptionRepository::new(state.db().clone());
    let created = repo
        .find_by_id(&outcome.record_id.to_string())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::internal("Created consumption slip not readable"))?;
    Ok(Json(created))
}

/// Update a consumption slip (step-up: password + reason)
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<Sensitive<ConsumptionUpdate>>,
) -> AppResult<Json<Consumption>> {
    let repo = ConsumptionRepository::new(state.db().clone());
    let before = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;

    let after = before.apply_update(req.data);
    validate_consumption(&after)?;

    records::submit_update(&state, &user, TABLE, &id, &before, &after, &req.password, &req.reason)
        .await?;

    let updated = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;
    Ok(Json(updated))
}

/// Delete a consumption slip (step-up: password + reason)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<ActionRequest>,
) -> AppResult<Json<bool>> {
    let repo = ConsumptionRepository::new(state.db().clone());
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

/// Audit history for a consumption slip (step-up: password only)
pub async fn history(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<HistoryRequest>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let entries = records::fetch_history(&state, &user, TABLE, &id, &req.password).await?;
    Ok(Json(entries))
}
