//! Loan API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::api::payload::{ActionRequest, HistoryRequest, Sensitive};
use crate::api::records;
use crate::audit::HistoryEntry;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Loan, LoanCreate, LoanStatus, LoanUpdate};
use crate::db::repository::{EquipmentRepository, LoanRepository};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const TABLE: &str = "loan";

fn validate_loan(loan: &Loan) -> AppResult<()> {
    validate_required_text(&loan.equipment, "equipment", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&loan.borrower, "borrower", MAX_NAME_LEN)?;
    validate_required_text(&loan.borrowed_at, "borrowed_at", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&loan.note, "note", MAX_NOTE_LEN)?;
    Ok(())
}

/// List all loans
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Loan>>> {
    let repo = LoanRepository::new(state.db().clone());
    let loans = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(loans))
}

/// Get loan by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Loan>> {
    let repo = LoanRepository::new(state.db().clone());
    let loan = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;
    Ok(Json(loan))
}

/// Lend out a unit (step-up: password + reason)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<Sensitive<LoanCreate>>,
) -> AppResult<Json<Loan>> {
    let loan = Loan::from_create(req.data);
    validate_loan(&loan)?;

    // The unit must exist and not already be out
    let equipment_repo = EquipmentRepository::new(state.db().clone());
    equipment_repo
        .find_by_id(&loan.equipment)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::EquipmentNotFound))?;
    let loan_repo = LoanRepository::new(state.db().clone());
    if !loan_repo
        .find_outstanding_for_equipment(&loan.equipment)
        .await
        .map_err(AppError::from)?
        .is_empty()
    {
        return Err(AppError::conflict("Equipment is already on loan"));
    }

    let outcome =
        records::submit_create(&state, &user, TABLE, &loan, &req.password, &req.reason).await?;

    let created = loan_repo
        .find_by_id(&outcome.record_id.to_string())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::internal("Created loan not readable"))?;
    Ok(Json(created))
}

/// Update a loan (step-up: password + reason)
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<Sensitive<LoanUpdate>>,
) -> AppResult<Json<Loan>> {
    let repo = LoanRepository::new(state.db().clone());
    let before = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;

    let after = before.apply_update(req.data);
    validate_loan(&after)?;

    records::submit_update(&state, &user, TABLE, &id, &before, &after, &req.password, &req.reason)
        .await?;

    let updated = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;
    Ok(Json(updated))
}

/// Return payload: the return date (defaults to today)
#[derive(Debug, Deserialize)]
pub struct ReturnData {
    pub returned_at: Option<String>,
}

/// Record the return of a borrowed unit (step-up: password + reason)
pub async fn record_return(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<Sensitive<ReturnData>>,
) -> AppResult<Json<Loan>> {
    let repo = LoanRepository::new(state.db().clone());
    let before = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;

    if before.status == LoanStatus::Returned {
        return Err(AppError::new(ErrorCode::LoanAlreadyReturned));
    }

    let returned_at = req
        .data
        .returned_at
        .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());
    let after = before.apply_update(LoanUpdate {
        borrower: None,
        due_at: None,
        returned_at: Some(returned_at),
        status: Some(LoanStatus::Returned),
        note: None,
    });

    records::submit_update(&state, &user, TABLE, &id, &before, &after, &req.password, &req.reason)
        .await?;

    let updated = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::record_not_found(TABLE, &*id))?;
    Ok(Json(updated))
}

/// Delete a loan record (step-up: password + reason)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<ActionRequest>,
) -> AppResult<Json<bool>> {
    let repo = LoanRepository::new(state.db().clone());
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

/// Audit history for a loan (step-up: password only)
pub async fn history(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<HistoryRequest>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let entries = records::fetch_history(&state, &user, TABLE, &id, &req.password).await?;
    Ok(Json(entries))
}
