use crate::config::GridSpec;
use crate::error::AppError;
use crate::grid::paginate::Paginator;
use crate::grid::state::{GridFilter, GridOrder};
use crate::sql::select_grid;
use crate::store::EntityStore;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const NO_MATCH_NOTICE: &str = "The search did not match any collection.";

/// View data of a grid list page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub paginator: Paginator<Value>,
    /// Submitted filter values, echoed back to the filter form.
    pub filters: BTreeMap<String, String>,
    pub order: GridOrder,
    pub per_page: u32,
    /// The grid configuration, for rendering headers and filter widgets.
    pub params: GridSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Query, materialize and paginate the grid of `spec` under the stored filter state.
pub async fn render_grid(
    store: &dyn EntityStore,
    spec: &GridSpec,
    filter: Option<&GridFilter>,
    is_async: bool,
) -> Result<GridView, AppError> {
    let mut filter = filter.cloned().unwrap_or_default();
    filter.retain_known(spec);

    let q = select_grid(spec, &filter.conditions.conditions, &filter.conditions.having, &filter.order);
    let rows = store.fetch_grid(spec.entity.meta(), &q).await?;
    tracing::debug!(controller = %spec.controller, rows = rows.len(), "grid fetched");

    let notice = (rows.is_empty() && !is_async).then(|| NO_MATCH_NOTICE.to_string());
    Ok(GridView {
        paginator: Paginator::paginate(rows, filter.page, filter.per_page),
        filters: filter.post,
        order: filter.order,
        per_page: filter.per_page,
        params: spec.clone(),
        notice,
    })
}
