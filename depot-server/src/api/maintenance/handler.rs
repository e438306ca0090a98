//! Maintenance API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::payload::{ActionRequest, HistoryRequest, Sensitive};
use crate::api::records;
use crate::audit::HistoryEntry;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Maintenance, MaintenanceCreate, MaintenanceUpdate};
use crate::db::repository::MaintenanceRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult};

const TABLE: &str = "maintenance";

fn validate_maintenance(ticket: &Maintenance) -> AppResult<()> {
    validate_required_text(&ticket.equipment, "equipment", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&ticket.reported_by, "reported_by", MAX_NAME_LEN)?;
    validate_required_text(&ticket.fault_desc, "fault_desc", MAX_NOTE_LEN)?;
    for part in &ticket.parts_replaced {
        validate_required_text(&part.name, "part name", MAX_NAME_LEN)?;
        if part.quantity <= 0 {
            return Err(AppError::validation("part quantity must be positive"));
        }
    }
    if ticket.cost.is_some_and(|c| c.is_sign_negative()) {
        return Err(AppError::validation("cost must not be negative"));
    }
    Ok(())
}

/// List all maintenance tickets
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Maintenance>>> {
    let repo = MaintenanceRepository::new(state.db().clone());
    let tickets = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(tickets))
}

/// Get maintenance ticket by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Maintenance>> {
    let repo = MaintenanceRepository::new(state.db().clone());
    let ticket = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;
    Ok(Json(ticket))
}

/// Open a maintenance ticket (step-up: password + reason)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<Sensitive<MaintenanceCreate>>,
) -> AppResult<Json<Maintenance>> {
    let ticket = Maintenance::from_create(req.data);
    validate_maintenance(&ticket)?;

    let outcome =
        records::submit_create(&state, &user, TABLE, &ticket, &req.password, &req.reason).await?;

    let repo = MaintenanceRepository::new(state.db().clone());
    let created = repo
        .find_by_id(&outcome.record_id.to_string())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::internal("Created maintenance ticket not readable"))?;
    Ok(Json(created))
}

/// Update a maintenance ticket (step-up: password + reason)
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<Sensitive<MaintenanceUpdate>>,
) -> AppResult<Json<Maintenance>> {
    let repo = MaintenanceRepository::new(state.db().clone());
    let before = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;

    let after = before.apply_update(req.data);
    validate_maintenance(&after)?;

    records::submit_update(&state, &user, TABLE, &id, &before, &after, &req.password, &req.reason)
        .await?;

    let updated = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;
    Ok(Json(updated))
}

/// Delete a maintenance ticket (step-up: password + reason)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<ActionRequest>,
) -> AppResult<Json<bool>> {
    let repo = MaintenanceRepository::new(state.db().clone());
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

/// Audit history for a maintenance ticket (step-up: password only)
pub async fn history(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<HistoryRequest>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let entries = records::fetch_history(&state, &user, TABLE, &id, &req.password).await?;
    Ok(Json(entries))
}
