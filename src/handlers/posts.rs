//! Post form endpoints of the `posts` and `pages` controllers.

use crate::error::AppError;
use crate::extractors::{AsyncRequest, Referer};
use crate::forms::{Form as FormSpec, PostsForm};
use crate::models::{Post, POST_TYPE_PAGES};
use crate::registry::EntityKind;
use crate::response::{success_one_ok, ActionReply, SuccessOne};
use crate::service::{save_post, CrudService, ENTRY_NOT_FOUND};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Form, Json,
};
use std::collections::HashMap;

pub const SAVE_OK: &str = "Post was saved successfully";

fn require_posts(controller: &str) -> Result<(), AppError> {
    match EntityKind::from_route(controller) {
        Some(EntityKind::Posts) => Ok(()),
        _ => Err(AppError::NotFound(format!("'{}' has no post form", controller))),
    }
}

/// GET /:controller/form
pub async fn form_new(Path(controller): Path<String>) -> Result<(StatusCode, Json<SuccessOne<FormSpec>>), AppError> {
    require_posts(&controller)?;
    Ok(success_one_ok(PostsForm::build(None)))
}

/// GET /:controller/form/:id
pub async fn form_edit(
    State(state): State<AppState>,
    Path((controller, id)): Path<(String, i64)>,
) -> Result<(StatusCode, Json<SuccessOne<FormSpec>>), AppError> {
    require_posts(&controller)?;
    let post: Post = CrudService::find(state.store.as_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(ENTRY_NOT_FOUND.into()))?;
    Ok(success_one_ok(PostsForm::build(Some(&post))))
}

/// POST /:controller/save
pub async fn save(
    State(state): State<AppState>,
    Path(controller): Path<String>,
    AsyncRequest(is_async): AsyncRequest,
    Referer(referer): Referer,
    Form(mut data): Form<HashMap<String, String>>,
) -> ActionReply {
    let reply = ActionReply::new(is_async, referer);
    if let Err(err) = require_posts(&controller) {
        return reply.failure(err);
    }
    if controller == POST_TYPE_PAGES && data.get("type").map_or(true, |t| t.trim().is_empty()) {
        data.insert("type".into(), POST_TYPE_PAGES.to_string());
    }
    match save_post(state.store.as_ref(), &data, 0).await {
        Ok(_) => reply.success(SAVE_OK),
        Err(err) => reply.failure(err),
    }
}
