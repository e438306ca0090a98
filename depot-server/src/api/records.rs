//! Shared record-mutation plumbing for the resource handlers
//!
//! Each handler builds its typed before/after models, then comes through
//! here: authorize at the gate, normalize into drafts, hand the request to
//! the mutation engine. Keeping this in one place keeps the gate
//! unavoidable; handlers have no other path to the engine.

use serde::Serialize;

use crate::audit::{Draft, HistoryEntry, schema_for};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::parse_record_id;
use crate::mutation::engine::{MutationOutcome, MutationRequest};
use crate::mutation::gate::{self, SensitiveAction};
use crate::utils::{AppError, AppResult, ErrorCode};

fn draft_of<M: Serialize>(table: &str, model: &M) -> AppResult<Draft> {
    let schema = schema_for(table)
        .ok_or_else(|| AppError::with_message(ErrorCode::UnknownEntityType, table.to_string()))?;
    Draft::from_model(schema, model)
        .map_err(|e| AppError::with_message(ErrorCode::SerializationError, e.to_string()))
}

/// Create a record under step-up authorization
pub async fn submit_create<M: Serialize>(
    state: &ServerState,
    user: &CurrentUser,
    table: &str,
    model: &M,
    password: &str,
    reason: &str,
) -> AppResult<MutationOutcome> {
    let after = draft_of(table, model)?;
    let auth = gate::authorize(
        state.accounts(),
        SensitiveAction::Edit,
        &user.id,
        &user.display_name,
        password,
        Some(reason),
    )
    .await?;

    state
        .engine()
        .submit(
            &auth,
            MutationRequest {
                table: table.to_string(),
                record_id: None,
                before: None,
                after: Some(after),
                reason: reason.to_string(),
            },
        )
        .await
        .map_err(AppError::from)
}

/// Update a record under step-up authorization
pub async fn submit_update<M: Serialize>(
    state: &ServerState,
    user: &CurrentUser,
    table: &str,
    id: &str,
    before: &M,
    after: &M,
    password: &str,
    reason: &str,
) -> AppResult<MutationOutcome> {
    let record_id = parse_record_id(table, id)?;
    let before = draft_of(table, before)?;
    let after = draft_of(table, after)?;
    let auth = gate::authorize(
        state.accounts(),
        SensitiveAction::Edit,
        &user.id,
        &user.display_name,
        password,
        Some(reason),
    )
    .await?;

    state
        .engine()
        .submit(
            &auth,
            MutationRequest {
                table: table.to_string(),
                record_id: Some(record_id),
                before: Some(before),
                after: Some(after),
                reason: reason.to_string(),
            },
        )
        .await
        .map_err(AppError::from)
}

/// Delete a record under step-up authorization
pub async fn submit_delete<M: Serialize>(
    state: &ServerState,
    user: &CurrentUser,
    table: &str,
    id: &str,
    before: &M,
    password: &str,
    reason: &str,
) -> AppResult<MutationOutcome> {
    let record_id = parse_record_id(table, id)?;
    let before = draft_of(table, before)?;
    let auth = gate::authorize(
        state.accounts(),
        SensitiveAction::Delete,
        &user.id,
        &user.display_name,
        password,
        Some(reason),
    )
    .await?;

    state
        .engine()
        .submit(
            &auth,
            MutationRequest {
                table: table.to_string(),
                record_id: Some(record_id),
                before: Some(before),
                after: None,
                reason: reason.to_string(),
            },
        )
        .await
        .map_err(AppError::from)
}

/// Fetch a record's audit history under step-up authorization
pub async fn fetch_history(
    state: &ServerState,
    user: &CurrentUser,
    table: &str,
    id: &str,
    password: &str,
) -> AppResult<Vec<HistoryEntry>> {
    let record_id = parse_record_id(table, id)?;
    gate::authorize(
        state.accounts(),
        SensitiveAction::ViewHistory,
        &user.id,
        &user.display_name,
        password,
        None,
    )
    .await?;

    state
        .history()
        .fetch_history(table, &record_id.key().to_string())
        .await
}
