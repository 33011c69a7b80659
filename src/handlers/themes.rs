//! Theme info and site options.

use crate::error::AppError;
use crate::extractors::{AsyncRequest, Referer};
use crate::response::{success_one_ok, ActionReply};
use crate::state::AppState;
use crate::theme::ThemeInfo;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

pub const OPTIONS_SAVED: &str = "Options were saved successfully";

fn require_options_controller(controller: &str) -> Result<(), AppError> {
    match controller {
        "themes" | "settings" => Ok(()),
        other => Err(AppError::NotFound(format!("'{}' has no options", other))),
    }
}

/// GET /:controller/options
pub async fn show_options(State(state): State<AppState>, Path(controller): Path<String>) -> Result<Response, AppError> {
    require_options_controller(&controller)?;
    let info = ThemeInfo::load(&state.theme).await?;
    let options = state.theme.options().await?;
    Ok(success_one_ok(serde_json::json!({
        "theme": info,
        "options": options,
    }))
    .into_response())
}

/// POST /:controller/options with a JSON object of option pairs.
pub async fn save_options(
    State(state): State<AppState>,
    Path(controller): Path<String>,
    AsyncRequest(is_async): AsyncRequest,
    Referer(referer): Referer,
    Json(body): Json<Value>,
) -> ActionReply {
    let reply = ActionReply::new(is_async, referer);
    let result = match (require_options_controller(&controller), body) {
        (Err(err), _) => Err(err),
        (Ok(()), Value::Object(pairs)) => state.theme.save_config(pairs).await,
        (Ok(()), _) => Err(AppError::BadRequest("options must be a JSON object".into())),
    };
    match result {
        Ok(()) => reply.success(OPTIONS_SAVED),
        Err(err) => reply.failure(err),
    }
}
