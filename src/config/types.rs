//! Raw grid configuration as stored in `grids/{controller}.json`.

use serde::{Deserialize, Serialize};

/// Filter widget settings of one grid column.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// `string`, `int` or `bool`. Anything else binds like `bool`.
    #[serde(default)]
    pub sanitize: Option<String>,
    /// Widget hint for the view layer (`input`, `select`, ...).
    #[serde(default, rename = "type")]
    pub widget: Option<String>,
    /// Options for select widgets: value → label.
    #[serde(default)]
    pub values: Vec<(String, String)>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridColumnConfig {
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub order_key: Option<String>,
    #[serde(default)]
    pub filter_key: Option<String>,
    /// Columns without a filter block are sort-only.
    #[serde(default)]
    pub filter: Option<FilterConfig>,
    /// Filter on the aggregated row (HAVING) instead of WHERE.
    #[serde(default)]
    pub having: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JoinConfig {
    /// `innerJoin`, `leftJoin`, `rightJoin` or `join`.
    #[serde(rename = "type")]
    pub join_type: String,
    /// Entity name of the joined model (e.g. `Users`).
    pub model: String,
    pub on: String,
    pub alias: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryConfig {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub joins: Vec<JoinConfig>,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default, rename = "where")]
    pub where_: Option<String>,
}

/// Grid of one backend controller.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridConfig {
    pub controller: String,
    /// Entity listed by the grid; defaults to the entity of the controller route.
    #[serde(default)]
    pub model: Option<String>,
    pub grid: Vec<GridColumnConfig>,
    #[serde(default)]
    pub query: QueryConfig,
}
