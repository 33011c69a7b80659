//! Generic toggle and delete actions on the entity behind the route.

use crate::error::AppError;
use crate::extractors::{AsyncRequest, Referer};
use crate::grid::sanitize_int;
use crate::registry::EntityKind;
use crate::response::ActionReply;
use crate::service::{CrudService, ENTRY_NOT_FOUND};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Form,
};
use serde::Deserialize;

pub const TOGGLE_OK: &str = "Entry status changed successfully";
pub const TOGGLE_FAILED: &str = "An error occurred on changing entry status";
pub const DELETE_OK: &str = "Entry was successfully deleted";
const DEFAULT_TOGGLE_FIELD: &str = "status";

#[derive(Debug, Default, Deserialize)]
pub struct ToggleQuery {
    pub field: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    /// Explicit model name overriding the route's entity.
    pub model: Option<String>,
}

fn entity_for(controller: &str, model: Option<&str>) -> Result<EntityKind, AppError> {
    let kind = match model.map(str::trim).filter(|m| !m.is_empty()) {
        Some(name) => EntityKind::from_model_name(name),
        None => EntityKind::from_route(controller),
    };
    kind.ok_or_else(|| AppError::BadRequest(format!("'{}' manages no entity", model.unwrap_or(controller))))
}

/// `ids`, `ids[]` and `id` fields, each possibly a comma separated list.
fn collect_ids(pairs: &[(String, String)]) -> Vec<i64> {
    let mut ids: Vec<i64> = pairs
        .iter()
        .filter(|(k, _)| matches!(k.as_str(), "ids" | "ids[]" | "id"))
        .flat_map(|(_, v)| v.split(','))
        .filter_map(sanitize_int)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// GET|POST /:controller/toggle/:id
pub async fn toggle(
    State(state): State<AppState>,
    Path((controller, id)): Path<(String, String)>,
    Query(query): Query<ToggleQuery>,
    AsyncRequest(is_async): AsyncRequest,
    Referer(referer): Referer,
) -> ActionReply {
    let reply = ActionReply::new(is_async, referer);
    let field = query.field.as_deref().filter(|f| !f.is_empty()).unwrap_or(DEFAULT_TOGGLE_FIELD);
    let result = async {
        let kind = entity_for(&controller, None)?;
        let id = sanitize_int(&id).ok_or_else(|| AppError::NotFound(ENTRY_NOT_FOUND.into()))?;
        CrudService::toggle(state.store.as_ref(), kind, id, field).await
    }
    .await;
    match result {
        Ok(()) => reply.success(TOGGLE_OK),
        Err(err) => reply.failure_with(err, TOGGLE_FAILED),
    }
}

async fn delete_entries(state: &AppState, controller: &str, model: Option<&str>, ids: &[i64]) -> Result<u64, AppError> {
    let kind = entity_for(controller, model)?;
    CrudService::delete(state.store.as_ref(), kind, ids).await
}

fn delete_reply(reply: ActionReply, result: Result<u64, AppError>) -> ActionReply {
    match result {
        Ok(_) => reply.success(DELETE_OK),
        Err(err) => reply.failure(err),
    }
}

/// GET|POST /:controller/delete/:id
pub async fn delete_one(
    State(state): State<AppState>,
    Path((controller, id)): Path<(String, String)>,
    Query(query): Query<DeleteQuery>,
    AsyncRequest(is_async): AsyncRequest,
    Referer(referer): Referer,
) -> ActionReply {
    let ids: Vec<i64> = sanitize_int(&id).into_iter().collect();
    let result = delete_entries(&state, &controller, query.model.as_deref(), &ids).await;
    delete_reply(ActionReply::new(is_async, referer), result)
}

/// POST /:controller/delete with `ids` (repeated or comma separated) and optional `model`.
pub async fn delete_many(
    State(state): State<AppState>,
    Path(controller): Path<String>,
    Query(query): Query<DeleteQuery>,
    AsyncRequest(is_async): AsyncRequest,
    Referer(referer): Referer,
    Form(pairs): Form<Vec<(String, String)>>,
) -> ActionReply {
    let ids = collect_ids(&pairs);
    let model = query
        .model
        .or_else(|| pairs.iter().find(|(k, _)| k == "model").map(|(_, v)| v.clone()));
    let result = delete_entries(&state, &controller, model.as_deref(), &ids).await;
    delete_reply(ActionReply::new(is_async, referer), result)
}
