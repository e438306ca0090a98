//! Account API Handlers
//!
//! Accounts persist through their own repository (credential hashing), not
//! the generic record store, but they pass the same gate and their changes
//! land in the same audit pipeline. The declared account schema carries no
//! credential field, so password changes never show up in a diff.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::payload::{ActionRequest, HistoryRequest, Sensitive};
use crate::api::records;
use crate::audit::{AuditAction, Draft, HistoryEntry, schema_for};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Account, AccountCreate, AccountUpdate};
use crate::mutation::gate::{self, SensitiveAction};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const TABLE: &str = "account";

fn account_draft(account: &Account) -> AppResult<Draft> {
    let schema = schema_for(TABLE)
        .ok_or_else(|| AppError::with_message(ErrorCode::UnknownEntityType, TABLE))?;
    Draft::from_model(schema, account)
        .map_err(|e| AppError::with_message(ErrorCode::SerializationError, e.to_string()))
}

fn account_key(account: &Account) -> String {
    account
        .id
        .as_ref()
        .map(|id| id.key().to_string())
        .unwrap_or_default()
}

/// List active accounts
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Account>>> {
    let accounts = state.accounts().find_all().await.map_err(AppError::from)?;
    Ok(Json(accounts))
}

/// List all accounts including inactive
pub async fn list_with_inactive(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Account>>> {
    let accounts = state
        .accounts()
        .find_all_with_inactive()
        .await
        .map_err(AppError::from)?;
    Ok(Json(accounts))
}

/// Get account by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Account>> {
    let account = state
        .accounts()
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))?;
    Ok(Json(account))
}

/// Create an account (step-up: password + reason)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<Sensitive<AccountCreate>>,
) -> AppResult<Json<Account>> {
    validate_required_text(&req.data.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.data.password, "password", MAX_PASSWORD_LEN)?;
    if let Some(ref display_name) = req.data.display_name {
        validate_required_text(display_name, "display_name", MAX_NAME_LEN)?;
    }

    let auth = gate::authorize(
        state.accounts(),
        SensitiveAction::Edit,
        &user.id,
        &user.display_name,
        &req.password,
        Some(&req.reason),
    )
    .await?;

    let account = state.accounts().create(req.data).await.map_err(AppError::from)?;

    let after = account_draft(&account)?;
    state
        .engine()
        .record_changes(
            &auth,
            TABLE,
            &account_key(&account),
            AuditAction::Insert,
            None,
            Some(&after),
            &req.reason,
        )
        .await
        .map_err(AppError::from)?;

    Ok(Json(account))
}

/// Update an account (step-up: password + reason)
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<Sensitive<AccountUpdate>>,
) -> AppResult<Json<Account>> {
    let repo = state.accounts();
    let before = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))?;

    let auth = gate::authorize(
        repo.clone(),
        SensitiveAction::Edit,
        &user.id,
        &user.display_name,
        &req.password,
        Some(&req.reason),
    )
    .await?;

    let updated = repo.update(&id, req.data).await.map_err(AppError::from)?;

    let before_draft = account_draft(&before)?;
    let after_draft = account_draft(&updated)?;
    state
        .engine()
        .record_changes(
            &auth,
            TABLE,
            &account_key(&updated),
            AuditAction::Update,
            Some(&before_draft),
            Some(&after_draft),
            &req.reason,
        )
        .await
        .map_err(AppError::from)?;

    Ok(Json(updated))
}

/// Delete an account (step-up: password + reason)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<ActionRequest>,
) -> AppResult<Json<bool>> {
    let repo = state.accounts();
    let before = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))?;

    // Deleting the account you are logged in as is always a mistake
    if before.id.as_ref().map(|t| t.to_string()).as_deref() == Some(user.id.as_str()) {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }

    let auth = gate::authorize(
        repo.clone(),
        SensitiveAction::Delete,
        &user.id,
        &user.display_name,
        &req.password,
        req.reason.as_deref(),
    )
    .await?;

    repo.delete(&id).await.map_err(AppError::from)?;

    let before_draft = account_draft(&before)?;
    state
        .engine()
        .record_changes(
            &auth,
            TABLE,
            &account_key(&before),
            AuditAction::Delete,
            Some(&before_draft),
            None,
            req.reason.as_deref().unwrap_or_default(),
        )
        .await
        .map_err(AppError::from)?;

    Ok(Json(true))
}

/// Audit history for an account (step-up: password only)
pub async fn history(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<HistoryRequest>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let entries = records::fetch_history(&state, &user, TABLE, &id, &req.password).await?;
    Ok(Json(entries))
}
