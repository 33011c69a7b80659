//! Resolved grid specifications: config validated and flattened for request-time use.

use crate::registry::EntityKind;
use serde::Serialize;
use std::collections::HashMap;

/// Alias of the listed entity in every grid query.
pub const MAIN_ALIAS: &str = "a";

/// Order column used when the submission names no known grid column.
pub const DEFAULT_ORDER_COLUMN: &str = "a.id";

/// How a filter value is sanitized and bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sanitize {
    String,
    Int,
    Bool,
}

impl Sanitize {
    /// Only `string` and `int` are recognized; any other declaration binds as bool.
    pub fn from_config(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("string") => Sanitize::String,
            Some(s) if s.eq_ignore_ascii_case("int") => Sanitize::Int,
            _ => Sanitize::Bool,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridColumn {
    pub key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_key: Option<String>,
    /// False for sort-only columns: submitted values for them are ignored.
    pub filterable: bool,
    pub sanitize: Sanitize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<(String, String)>,
    pub having: bool,
}

impl GridColumn {
    /// Column (or expression) compared by the filter.
    pub fn filter_column(&self) -> &str {
        self.filter_key.as_deref().unwrap_or(&self.key)
    }

    /// Column (or expression) used for ORDER BY.
    pub fn order_column(&self) -> &str {
        self.order_key.as_deref().unwrap_or(&self.key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Plain,
}

impl JoinKind {
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "innerJoin" => Some(JoinKind::Inner),
            "leftJoin" => Some(JoinKind::Left),
            "rightJoin" => Some(JoinKind::Right),
            "join" => Some(JoinKind::Plain),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Plain => "JOIN",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct GridJoin {
    pub kind: JoinKind,
    pub entity: EntityKind,
    pub on: String,
    pub alias: String,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridQuery {
    pub columns: Vec<String>,
    pub joins: Vec<GridJoin>,
    pub group_by: Vec<String>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GridSpec {
    pub controller: String,
    pub entity: EntityKind,
    pub grid: Vec<GridColumn>,
    pub query: GridQuery,
}

impl GridSpec {
    pub fn column(&self, key: &str) -> Option<&GridColumn> {
        self.grid.iter().find(|c| c.key == key)
    }

    /// The column named `key` if it accepts filter values.
    pub fn filter_column(&self, key: &str) -> Option<&GridColumn> {
        self.column(key).filter(|c| c.filterable)
    }

    /// Order column for a submitted `orderBy`: the column's override, the key itself,
    /// or the primary key when the key is unknown.
    pub fn resolve_order_column(&self, order_by: Option<&str>) -> String {
        order_by
            .and_then(|key| self.column(key))
            .map(|c| c.order_column().to_string())
            .unwrap_or_else(|| DEFAULT_ORDER_COLUMN.to_string())
    }

    pub fn is_order_column(&self, column: &str) -> bool {
        column == DEFAULT_ORDER_COLUMN || self.grid.iter().any(|c| c.order_column() == column)
    }
}

#[derive(Clone, Debug, Default)]
pub struct GridRegistry {
    by_controller: HashMap<String, GridSpec>,
}

impl GridRegistry {
    pub fn new(specs: Vec<GridSpec>) -> Self {
        GridRegistry {
            by_controller: specs.into_iter().map(|s| (s.controller.clone(), s)).collect(),
        }
    }

    pub fn get(&self, controller: &str) -> Option<&GridSpec> {
        self.by_controller.get(controller)
    }

    pub fn controllers(&self) -> impl Iterator<Item = &str> {
        self.by_controller.keys().map(String::as_str)
    }
}
