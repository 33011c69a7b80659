//! Per-controller grid filter state and its cookie representation.
//!
//! The cookie is rewritten on every submission without any coordination, so two
//! concurrent submissions from the same browser race and the last write wins. It
//! stores only the submitted values; bound conditions are rebuilt from them on read.

use crate::config::{GridSpec, Sanitize, DEFAULT_ORDER_COLUMN};
use crate::cookies;
use crate::grid::filter::conditions_for;
use crate::sql::BindValue;
use axum::http::HeaderMap;
use cookie::time::Duration;
use cookie::Cookie;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const GRID_FILTERS_COOKIE: &str = "gridFilters";
pub const GRID_FILTERS_TTL_DAYS: i64 = 30;
/// Browsers drop cookies above roughly this size.
pub const GRID_FILTERS_MAX_BYTES: usize = 4096;

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const ALLOWED_PER_PAGE: &[u32] = &[10];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// `asc`/`desc` in any case; everything else is ascending.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("desc") => Direction::Desc,
            _ => Direction::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridOrder {
    pub column: String,
    pub direction: Direction,
}

impl Default for GridOrder {
    fn default() -> Self {
        GridOrder {
            column: DEFAULT_ORDER_COLUMN.to_string(),
            direction: Direction::Asc,
        }
    }
}

impl std::fmt::Display for GridOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.column, self.direction.as_sql())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Like,
    Eq,
}

impl CompareOp {
    pub fn for_sanitize(sanitize: Sanitize) -> Self {
        match sanitize {
            Sanitize::String => CompareOp::Like,
            Sanitize::Int | Sanitize::Bool => CompareOp::Eq,
        }
    }
}

/// One bound filter condition: `column OP :param:` with `value` bound to `param`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub op: CompareOp,
    pub param: String,
    pub value: BindValue,
}

impl Condition {
    /// Placeholder notation of the condition, e.g. `title LIKE :title:`.
    pub fn clause(&self) -> String {
        let op = match self.op {
            CompareOp::Like => "LIKE",
            CompareOp::Eq => "=",
        };
        format!("{} {} :{}:", self.column, op, self.param)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridConditions {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub having: Vec<Condition>,
}

/// Active filter, sort and page selection of one controller's grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridFilter {
    #[serde(default)]
    pub order: GridOrder,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(skip)]
    pub conditions: GridConditions,
    /// Submitted filter values, echoed back to the filter form.
    #[serde(default)]
    pub post: BTreeMap<String, String>,
}

fn first_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for GridFilter {
    fn default() -> Self {
        GridFilter {
            order: GridOrder::default(),
            page: first_page(),
            per_page: default_per_page(),
            conditions: GridConditions::default(),
            post: BTreeMap::new(),
        }
    }
}

impl GridFilter {
    /// Drop everything the grid config would not have produced and rebuild the bound
    /// conditions from the kept values. The cookie is client controlled, so nothing in
    /// it reaches SQL without passing the grid config again.
    pub fn retain_known(&mut self, spec: &GridSpec) {
        let (conditions, post) = conditions_for(spec, &self.post);
        if post.len() != self.post.len() {
            tracing::warn!(
                controller = %spec.controller,
                dropped = self.post.len() - post.len(),
                "dropped unknown grid filter values"
            );
        }
        self.conditions = conditions;
        self.post = post;
        if !spec.is_order_column(&self.order.column) {
            self.order = GridOrder::default();
        }
        if self.page == 0 {
            self.page = first_page();
        }
        if !ALLOWED_PER_PAGE.contains(&self.per_page) {
            self.per_page = default_per_page();
        }
    }
}

/// Filter state of every controller, keyed by controller name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridFilters(BTreeMap<String, GridFilter>);

impl GridFilters {
    /// Read the `gridFilters` cookie. A missing or unreadable cookie is an empty state.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(raw) = cookies::read(headers, GRID_FILTERS_COOKIE) else {
            return GridFilters::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable grid filter cookie");
            GridFilters::default()
        })
    }

    pub fn get(&self, controller: &str) -> Option<&GridFilter> {
        self.0.get(controller)
    }

    pub fn set(&mut self, controller: &str, filter: GridFilter) {
        self.0.insert(controller.to_string(), filter);
    }

    pub fn remove(&mut self, controller: &str) -> Option<GridFilter> {
        self.0.remove(controller)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_cookie(&self) -> Cookie<'static> {
        let value = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        let cookie = cookies::persistent(GRID_FILTERS_COOKIE, value, Duration::days(GRID_FILTERS_TTL_DAYS));
        let size = cookie.encoded().to_string().len();
        if size > GRID_FILTERS_MAX_BYTES {
            tracing::warn!(size, controllers = self.0.len(), "grid filter cookie exceeds browser limit");
        }
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, GridConfig};
    use axum::http::{header, HeaderValue};
    use serde_json::json;

    fn spec() -> GridSpec {
        let config: GridConfig = serde_json::from_value(json!({
            "controller": "users",
            "grid": [
                {"key": "username", "filter": {"sanitize": "string"}},
                {"key": "status", "filterKey": "a.status", "filter": {"sanitize": "int"}},
                {"key": "createdAt", "orderKey": "a.created_at"}
            ]
        }))
        .unwrap();
        resolve(&[config]).unwrap().get("users").unwrap().clone()
    }

    #[test]
    fn direction_normalizes_to_asc() {
        assert_eq!(Direction::parse(Some("desc")), Direction::Desc);
        assert_eq!(Direction::parse(Some("DESC")), Direction::Desc);
        assert_eq!(Direction::parse(Some("sideways")), Direction::Asc);
        assert_eq!(Direction::parse(None), Direction::Asc);
    }

    #[test]
    fn clause_uses_placeholder_notation() {
        let cond = Condition {
            column: "title".into(),
            op: CompareOp::Like,
            param: "title".into(),
            value: BindValue::String("%hello%".into()),
        };
        assert_eq!(cond.clause(), "title LIKE :title:");
    }

    fn cookie_headers(filters: &GridFilters) -> HeaderMap {
        let set_cookie = crate::cookies::header_value(&filters.to_cookie()).unwrap();
        let pair = set_cookie.to_str().unwrap().split(';').next().unwrap().to_string();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(&pair).unwrap());
        headers
    }

    #[test]
    fn tampered_cookie_is_rebuilt_from_grid_config() {
        let raw = json!({
            "users": {
                "order": {"column": "pg_sleep(10)", "direction": "DESC"},
                "perPage": 5000,
                "conditions": {"conditions": [
                    {"column": "1=1) OR (1", "op": "eq", "param": "username", "value": 1}
                ]},
                "post": {"status": "1", "createdAt": "1700000000", "password": "x"}
            }
        });
        let mut headers = HeaderMap::new();
        let cookie = cookies::persistent(GRID_FILTERS_COOKIE, raw.to_string(), Duration::days(1));
        let encoded = cookie.encoded().to_string();
        let pair = encoded.split(';').next().unwrap();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());

        let mut filter = GridFilters::from_headers(&headers).get("users").cloned().unwrap();
        filter.retain_known(&spec());
        assert_eq!(filter.conditions.conditions.len(), 1);
        assert_eq!(filter.conditions.conditions[0].clause(), "a.status = :status:");
        assert!(filter.conditions.having.is_empty());
        assert_eq!(filter.post.keys().collect::<Vec<_>>(), vec!["status"]);
        assert_eq!(filter.order, GridOrder::default());
        assert_eq!(filter.per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn cookie_stores_each_value_once() {
        let mut filter = GridFilter::default();
        filter.post.insert("username".into(), "needle".into());
        filter.retain_known(&spec());
        assert_eq!(filter.conditions.conditions.len(), 1);

        let mut filters = GridFilters::default();
        filters.set("users", filter);
        let json = serde_json::to_string(&filters).unwrap();
        assert_eq!(json.matches("needle").count(), 1);
        assert!(!json.contains("conditions"));

        let mut restored = GridFilters::from_headers(&cookie_headers(&filters)).get("users").cloned().unwrap();
        restored.retain_known(&spec());
        assert_eq!(restored.conditions.conditions[0].value, BindValue::String("%needle%".into()));
    }

    #[test]
    fn cookie_round_trip_restores_state() {
        let mut filters = GridFilters::default();
        let mut filter = GridFilter::default();
        filter.page = 3;
        filter.order.direction = Direction::Desc;
        filters.set("users", filter.clone());

        let restored = GridFilters::from_headers(&cookie_headers(&filters));
        assert_eq!(restored.get("users"), Some(&filter));
    }

    #[test]
    fn garbage_cookie_reads_as_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("gridFilters=a%3A1%3A%7B"));
        assert!(GridFilters::from_headers(&headers).is_empty());
    }
}
