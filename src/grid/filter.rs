//! Turns a posted filter form into grid filter state.

use crate::config::{GridColumn, GridSpec, Sanitize};
use crate::grid::state::{
    CompareOp, Condition, Direction, GridConditions, GridFilter, GridFilters, GridOrder, ALLOWED_PER_PAGE,
    DEFAULT_PER_PAGE,
};
use crate::sql::BindValue;
use std::collections::BTreeMap;

const ORDER_BY: &str = "orderBy";
const ORDER_WAY: &str = "orderWay";
const PAGE: &str = "page";
const PER_PAGE: &str = "perPage";
const RESET_FILTER: &str = "resetFilter";

/// A filter form submission split into its control fields and filter values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridSubmission {
    pub order_by: Option<String>,
    pub order_way: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub reset: bool,
    pub values: BTreeMap<String, String>,
}

impl GridSubmission {
    /// Later duplicates of a key win, as with a PHP `$_POST` array.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut sub = GridSubmission::default();
        for (key, value) in pairs {
            match key.as_str() {
                ORDER_BY => sub.order_by = Some(value),
                ORDER_WAY => sub.order_way = Some(value),
                PAGE => sub.page = Some(value),
                PER_PAGE => sub.per_page = Some(value),
                RESET_FILTER => sub.reset = !value.trim().is_empty() && value.trim() != "0",
                _ => {
                    sub.values.insert(key, value);
                }
            }
        }
        sub
    }
}

fn parse_page(value: Option<&str>) -> u32 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|p| *p > 0)
        .and_then(|p| u32::try_from(p).ok())
        .unwrap_or(1)
}

fn parse_per_page(value: Option<&str>) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|n| ALLOWED_PER_PAGE.contains(n))
        .unwrap_or(DEFAULT_PER_PAGE)
}

/// Keep digits and signs, then parse. `"1x2"` is 12.
pub fn sanitize_int(value: &str) -> Option<i64> {
    let kept: String = value.chars().filter(|c| c.is_ascii_digit() || *c == '-' || *c == '+').collect();
    kept.parse().ok()
}

/// Boolean-like columns store 0/1 integers, so a bool filter binds as one.
fn sanitize_bool(value: &str) -> i64 {
    i64::from(!matches!(value.trim().to_ascii_lowercase().as_str(), "" | "0" | "false" | "off" | "no"))
}

/// Bound condition for one posted value, or `None` when the value does not sanitize.
fn build_condition(column: &GridColumn, value: &str) -> Option<Condition> {
    let bound = match column.sanitize {
        Sanitize::String => BindValue::String(format!("%{}%", value.trim())),
        Sanitize::Int => BindValue::I64(sanitize_int(value)?),
        Sanitize::Bool => BindValue::I64(sanitize_bool(value)),
    };
    Some(Condition {
        column: column.filter_column().to_string(),
        op: CompareOp::for_sanitize(column.sanitize),
        param: column.key.clone(),
        value: bound,
    })
}

/// Bound conditions for the posted values of filterable columns, plus the values
/// that produced them. Unknown, sort-only, empty and unsanitizable entries are dropped.
pub(crate) fn conditions_for(
    spec: &GridSpec,
    values: &BTreeMap<String, String>,
) -> (GridConditions, BTreeMap<String, String>) {
    let mut conditions = GridConditions::default();
    let mut post = BTreeMap::new();
    for (key, value) in values {
        if value.trim().is_empty() {
            continue;
        }
        let Some(column) = spec.filter_column(key) else {
            continue;
        };
        let Some(condition) = build_condition(column, value) else {
            tracing::debug!(controller = %spec.controller, key = %key, "dropped unsanitizable filter value");
            continue;
        };
        if column.having {
            conditions.having.push(condition);
        } else {
            conditions.conditions.push(condition);
        }
        post.insert(key.clone(), value.clone());
    }
    (conditions, post)
}

/// Filter state for one controller built from a submission.
pub fn build_filter(spec: &GridSpec, submission: &GridSubmission) -> GridFilter {
    let (conditions, post) = conditions_for(spec, &submission.values);
    GridFilter {
        order: GridOrder {
            column: spec.resolve_order_column(submission.order_by.as_deref()),
            direction: Direction::parse(submission.order_way.as_deref()),
        },
        page: parse_page(submission.page.as_deref()),
        per_page: parse_per_page(submission.per_page.as_deref()),
        conditions,
        post,
    }
}

/// Apply a submission to the stored filters: reset drops the controller's entry,
/// anything else replaces it.
pub fn apply_submission(filters: &mut GridFilters, spec: &GridSpec, submission: &GridSubmission) {
    if submission.reset {
        filters.remove(&spec.controller);
        tracing::info!(controller = %spec.controller, "grid filter reset");
        return;
    }
    let filter = build_filter(spec, submission);
    tracing::info!(
        controller = %spec.controller,
        order = %filter.order,
        page = filter.page,
        conditions = filter.conditions.conditions.len(),
        having = filter.conditions.having.len(),
        "grid filter stored"
    );
    filters.set(&spec.controller, filter);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, GridConfig};
    use serde_json::json;

    fn posts_spec() -> GridSpec {
        let config: GridConfig = serde_json::from_value(json!({
            "controller": "posts",
            "grid": [
                {"key": "title", "filter": {"sanitize": "string"}},
                {"key": "username", "filterKey": "u.username", "orderKey": "u.username", "filter": {"sanitize": "string"}},
                {"key": "views", "filterKey": "a.number_views", "filter": {"sanitize": "int"}},
                {"key": "sticked", "filter": {"sanitize": "yesno"}},
                {"key": "replies", "filterKey": "COUNT(r.id)", "having": true, "filter": {"sanitize": "int"}}
            ]
        }))
        .unwrap();
        resolve(&[config]).unwrap().get("posts").unwrap().clone()
    }

    fn submit(pairs: &[(&str, &str)]) -> GridSubmission {
        GridSubmission::from_pairs(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn title_search_sorted_desc_on_page_two() {
        let filter = build_filter(
            &posts_spec(),
            &submit(&[("title", "hello"), ("orderBy", "title"), ("orderWay", "desc"), ("page", "2")]),
        );
        assert_eq!(filter.conditions.conditions.len(), 1);
        let cond = &filter.conditions.conditions[0];
        assert_eq!(cond.clause(), "title LIKE :title:");
        assert_eq!(cond.value, BindValue::String("%hello%".into()));
        assert_eq!(filter.order.to_string(), "title DESC");
        assert_eq!(filter.page, 2);
        assert_eq!(filter.per_page, 10);
        assert_eq!(filter.post.get("title").map(String::as_str), Some("hello"));
    }

    #[test]
    fn unknown_and_empty_keys_produce_no_conditions() {
        let filter = build_filter(&posts_spec(), &submit(&[("password", "x"), ("title", "  "), ("username", "")]));
        assert!(filter.conditions.conditions.is_empty());
        assert!(filter.conditions.having.is_empty());
        assert!(filter.post.is_empty());
    }

    #[test]
    fn override_keys_resolve_filter_and_order_columns() {
        let filter = build_filter(&posts_spec(), &submit(&[("username", "ann"), ("orderBy", "username")]));
        assert_eq!(filter.conditions.conditions[0].clause(), "u.username LIKE :username:");
        assert_eq!(filter.order.column, "u.username");
        assert_eq!(filter.order.direction, Direction::Asc);
    }

    #[test]
    fn unknown_order_key_falls_back_to_primary_key() {
        let filter = build_filter(&posts_spec(), &submit(&[("orderBy", "password"), ("orderWay", "sideways")]));
        assert_eq!(filter.order, GridOrder::default());
    }

    #[test]
    fn int_and_bool_values_bind_typed() {
        let filter = build_filter(&posts_spec(), &submit(&[("views", "1x2"), ("sticked", "0")]));
        let by_param: BTreeMap<_, _> =
            filter.conditions.conditions.iter().map(|c| (c.param.as_str(), c)).collect();
        assert_eq!(by_param["views"].clause(), "a.number_views = :views:");
        assert_eq!(by_param["views"].value, BindValue::I64(12));
        assert_eq!(by_param["sticked"].value, BindValue::I64(0));
    }

    #[test]
    fn bool_filter_binds_integer_flag() {
        let spec = posts_spec();
        let filter = build_filter(&spec, &submit(&[("sticked", "yes")]));
        let q = crate::sql::select_grid(&spec, &filter.conditions.conditions, &filter.conditions.having, &filter.order);
        assert!(q.sql.contains("\"sticked\" = $1"));
        assert_eq!(q.params, vec![BindValue::I64(1)]);
    }

    #[test]
    fn sort_only_column_takes_no_filter() {
        let config: GridConfig = serde_json::from_value(json!({
            "controller": "media",
            "grid": [
                {"key": "filename", "filter": {"sanitize": "string"}},
                {"key": "createdAt", "orderKey": "a.created_at"}
            ]
        }))
        .unwrap();
        let spec = resolve(&[config]).unwrap().get("media").unwrap().clone();
        let filter = build_filter(&spec, &submit(&[("createdAt", "1700000000"), ("orderBy", "createdAt")]));
        assert!(filter.conditions.conditions.is_empty());
        assert!(filter.post.is_empty());
        assert_eq!(filter.order.column, "a.created_at");

        let q = crate::sql::select_grid(&spec, &filter.conditions.conditions, &filter.conditions.having, &filter.order);
        assert!(!q.sql.contains("createdAt"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn unsanitizable_int_is_dropped() {
        let filter = build_filter(&posts_spec(), &submit(&[("views", "abc")]));
        assert!(filter.conditions.conditions.is_empty());
        assert!(!filter.post.contains_key("views"));
    }

    #[test]
    fn having_columns_go_to_having_list() {
        let filter = build_filter(&posts_spec(), &submit(&[("replies", "3")]));
        assert!(filter.conditions.conditions.is_empty());
        assert_eq!(filter.conditions.having[0].clause(), "COUNT(r.id) = :replies:");
    }

    #[test]
    fn page_and_per_page_are_normalized() {
        for page in ["0", "-4", "abc", ""] {
            assert_eq!(build_filter(&posts_spec(), &submit(&[("page", page)])).page, 1);
        }
        assert_eq!(build_filter(&posts_spec(), &submit(&[("perPage", "50")])).per_page, 10);
        assert_eq!(build_filter(&posts_spec(), &submit(&[("perPage", "10")])).per_page, 10);
    }

    #[test]
    fn reset_clears_only_that_controller() {
        let spec = posts_spec();
        let mut filters = GridFilters::default();
        apply_submission(&mut filters, &spec, &submit(&[("title", "hello")]));
        filters.set("users", GridFilter::default());
        assert!(filters.get("posts").is_some());

        apply_submission(&mut filters, &spec, &submit(&[("resetFilter", "1")]));
        assert!(filters.get("posts").is_none());
        assert!(filters.get("users").is_some());
    }

    #[test]
    fn resubmission_replaces_previous_state() {
        let spec = posts_spec();
        let mut filters = GridFilters::default();
        apply_submission(&mut filters, &spec, &submit(&[("title", "first"), ("page", "3")]));
        apply_submission(&mut filters, &spec, &submit(&[("username", "ann")]));
        let filter = filters.get("posts").unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.conditions.conditions.len(), 1);
        assert_eq!(filter.conditions.conditions[0].param, "username");
    }
}
