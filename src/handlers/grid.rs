//! Grid list and filter submission handlers.

use crate::config::GridSpec;
use crate::error::AppError;
use crate::extractors::{AsyncRequest, Referer};
use crate::flash::{Flash, FlashBag};
use crate::grid::{apply_submission, render_grid, GridFilters, GridSubmission, GridView};
use crate::response::{success_one_ok, ActionReply};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Form,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct ListPage {
    #[serde(flatten)]
    pub grid: GridView,
    /// Flash messages left by the previous action, consumed by this render.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flash: Vec<Flash>,
}

fn grid_for<'a>(state: &'a AppState, controller: &str) -> Result<&'a GridSpec, AppError> {
    state
        .grids
        .get(controller)
        .ok_or_else(|| AppError::NotFound(format!("no grid for '{}'", controller)))
}

/// GET /:controller
pub async fn list(
    State(state): State<AppState>,
    Path(controller): Path<String>,
    AsyncRequest(is_async): AsyncRequest,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let spec = grid_for(&state, &controller)?;
    let filters = GridFilters::from_headers(&headers);
    let grid = render_grid(state.store.as_ref(), spec, filters.get(&controller), is_async).await?;

    let flash = FlashBag::from_headers(&headers);
    let consumed = !flash.is_empty();
    let page = ListPage {
        grid,
        flash: flash.messages().to_vec(),
    };
    let mut response = success_one_ok(page).into_response();
    if consumed {
        if let Some(v) = crate::cookies::header_value(&FlashBag::removal_cookie()) {
            response.headers_mut().append(header::SET_COOKIE, v);
        }
    }
    Ok(response)
}

/// POST /:controller/grid
pub async fn submit(
    State(state): State<AppState>,
    Path(controller): Path<String>,
    Referer(referer): Referer,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<ActionReply, AppError> {
    let spec = grid_for(&state, &controller)?;
    let mut filters = GridFilters::from_headers(&headers);
    apply_submission(&mut filters, spec, &GridSubmission::from_pairs(pairs));
    Ok(ActionReply::new(false, referer).cookie(filters.to_cookie()))
}
