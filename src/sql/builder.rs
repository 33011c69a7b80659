//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for entities and grid lists.

use crate::config::{GridSpec, MAIN_ALIAS};
use crate::grid::{CompareOp, Condition, GridOrder};
use crate::models::EntityMeta;
use crate::sql::BindValue;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$").expect("static identifier pattern")
    })
}

/// `name` or `alias.name`.
pub fn is_qualified_identifier(s: &str) -> bool {
    identifier_re().is_match(s)
}

/// Config-supplied SQL fragment (join condition, aggregate, static where). Rejects
/// statement separators and comments; everything else is trusted config.
pub fn is_safe_expression(s: &str) -> bool {
    !s.trim().is_empty() && !s.contains(';') && !s.contains("--") && !s.contains("/*")
}

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Identifiers (`a.title`) are quoted part by part; other config expressions pass through.
fn column_sql(expr: &str) -> String {
    if is_qualified_identifier(expr) {
        expr.split('.').map(quoted).collect::<Vec<_>>().join(".")
    } else {
        expr.to_string()
    }
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf::default()
    }

    fn push_param(&mut self, v: BindValue) -> u32 {
        self.params.push(v);
        self.params.len() as u32
    }

    fn push_condition(&mut self, cond: &Condition) -> String {
        let n = self.push_param(cond.value.clone());
        match cond.op {
            CompareOp::Like => format!("({})::text ILIKE ${}", column_sql(&cond.column), n),
            CompareOp::Eq => format!("{} = ${}", column_sql(&cond.column), n),
        }
    }
}

fn select_column_list(meta: &EntityMeta) -> String {
    meta.storage_columns().map(quoted).collect::<Vec<_>>().join(", ")
}

/// SELECT by primary key.
pub fn select_by_id(meta: &EntityMeta, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(BindValue::I64(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(meta),
        quoted(meta.source),
        quoted(meta.primary_key),
        n
    );
    q
}

/// SELECT rows whose primary key is in `ids`, ordered by primary key.
pub fn select_by_ids(meta: &EntityMeta, ids: &[i64]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let cols = select_column_list(meta);
    let table = quoted(meta.source);
    if ids.is_empty() {
        q.sql = format!("SELECT {} FROM {} WHERE 1 = 0", cols, table);
        return q;
    }
    let placeholders: Vec<String> = ids
        .iter()
        .map(|id| format!("${}", q.push_param(BindValue::I64(*id))))
        .collect();
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} IN ({}) ORDER BY {}",
        cols,
        table,
        quoted(meta.primary_key),
        placeholders.join(", "),
        quoted(meta.primary_key)
    );
    q
}

/// First row matching all `(storage column, value)` pairs. Unknown columns are ignored.
pub fn select_first_by(meta: &EntityMeta, filters: &[(&str, BindValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    for (col, val) in filters {
        if meta.storage_columns().any(|c| c == *col) {
            let n = q.push_param(val.clone());
            where_parts.push(format!("{} = ${}", quoted(col), n));
        }
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {} LIMIT 1",
        select_column_list(meta),
        quoted(meta.source),
        where_clause,
        quoted(meta.primary_key)
    );
    q
}

/// INSERT of every mapped column present in `record` except the primary key.
pub fn insert(meta: &EntityMeta, record: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for name in meta.storage_columns() {
        if name == meta.primary_key {
            continue;
        }
        let Some(val) = record.get(name) else { continue };
        let n = q.push_param(BindValue::from_json(val));
        cols.push(quoted(name));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(meta.source),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(meta)
    );
    q
}

/// UPDATE by id: SET every mapped non-key column present in `record`.
pub fn update(meta: &EntityMeta, id: i64, record: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for name in meta.storage_columns() {
        if name == meta.primary_key {
            continue;
        }
        let Some(val) = record.get(name) else { continue };
        let n = q.push_param(BindValue::from_json(val));
        sets.push(format!("{} = ${}", quoted(name), n));
    }
    if sets.is_empty() {
        return select_by_id(meta, id);
    }
    let id_param = q.push_param(BindValue::I64(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(meta.source),
        sets.join(", "),
        quoted(meta.primary_key),
        id_param,
        select_column_list(meta)
    );
    q
}

/// DELETE rows whose primary key is in `ids`.
pub fn delete_by_ids(meta: &EntityMeta, ids: &[i64]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = quoted(meta.source);
    if ids.is_empty() {
        q.sql = format!("DELETE FROM {} WHERE 1 = 0", table);
        return q;
    }
    let placeholders: Vec<String> = ids
        .iter()
        .map(|id| format!("${}", q.push_param(BindValue::I64(*id))))
        .collect();
    q.sql = format!(
        "DELETE FROM {} WHERE {} IN ({})",
        table,
        quoted(meta.primary_key),
        placeholders.join(", ")
    );
    q
}

/// Grid list query: static structure from the grid config plus the dynamic where/having
/// conditions and order of the filter state. Conditions must already be checked
/// against the grid config.
pub fn select_grid(spec: &GridSpec, conditions: &[Condition], having: &[Condition], order: &GridOrder) -> QueryBuf {
    let mut q = QueryBuf::new();
    let query = &spec.query;
    let meta = spec.entity.meta();

    let columns = if query.columns.is_empty() {
        format!("{}.*", quoted(MAIN_ALIAS))
    } else {
        query.columns.iter().map(|c| column_sql(c)).collect::<Vec<_>>().join(", ")
    };

    let mut sql = format!("SELECT {} FROM {} AS {}", columns, quoted(meta.source), quoted(MAIN_ALIAS));
    for join in &query.joins {
        sql.push_str(&format!(
            " {} {} AS {} ON {}",
            join.kind.keyword(),
            quoted(join.entity.meta().source),
            quoted(&join.alias),
            join.on
        ));
    }

    let mut where_parts: Vec<String> = query.where_.iter().map(|w| format!("({})", w)).collect();
    for cond in conditions {
        where_parts.push(q.push_condition(cond));
    }
    if !where_parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_parts.join(" AND "));
    }

    if !query.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&query.group_by.iter().map(|g| column_sql(g)).collect::<Vec<_>>().join(", "));
    }

    let having_parts: Vec<String> = having.iter().map(|cond| q.push_condition(cond)).collect();
    if !having_parts.is_empty() {
        sql.push_str(" HAVING ");
        sql.push_str(&having_parts.join(" AND "));
    }

    sql.push_str(&format!(" ORDER BY {} {}", column_sql(&order.column), order.direction.as_sql()));
    q.sql = sql;
    q
}
