//! Entity storage. `EntityStore` is the seam between the backend and the database;
//! `PgStore` runs the queries built by `crate::sql` against PostgreSQL.

use crate::error::AppError;
use crate::models::EntityMeta;
use crate::sql::{self, BindValue, QueryBuf};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Rows are JSON objects keyed by storage column.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    /// Run a grid list query and materialize every row.
    async fn fetch_grid(&self, meta: &EntityMeta, query: &QueryBuf) -> Result<Vec<Value>, AppError>;

    async fn find_by_id(&self, meta: &EntityMeta, id: i64) -> Result<Option<Value>, AppError>;

    async fn find_by_ids(&self, meta: &EntityMeta, ids: &[i64]) -> Result<Vec<Value>, AppError>;

    /// First row (lowest id) matching every `(storage column, value)` pair.
    async fn find_first_by(&self, meta: &EntityMeta, filters: &[(&str, BindValue)]) -> Result<Option<Value>, AppError>;

    /// Insert a record; the primary key is assigned by storage. Returns the stored row.
    async fn insert(&self, meta: &EntityMeta, record: &Map<String, Value>) -> Result<Value, AppError>;

    async fn update(&self, meta: &EntityMeta, id: i64, record: &Map<String, Value>) -> Result<Option<Value>, AppError>;

    /// Returns the number of deleted rows.
    async fn delete_by_ids(&self, meta: &EntityMeta, ids: &[i64]) -> Result<u64, AppError>;
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    fn bind_all<'q>(
        q: &'q QueryBuf,
    ) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        query
    }

    async fn query_many(&self, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        let rows = Self::bind_all(q).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn query_optional(&self, q: &QueryBuf) -> Result<Option<Value>, AppError> {
        let row = Self::bind_all(q).fetch_optional(&self.pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn fetch_grid(&self, _meta: &EntityMeta, query: &QueryBuf) -> Result<Vec<Value>, AppError> {
        self.query_many(query).await
    }

    async fn find_by_id(&self, meta: &EntityMeta, id: i64) -> Result<Option<Value>, AppError> {
        self.query_optional(&sql::select_by_id(meta, id)).await
    }

    async fn find_by_ids(&self, meta: &EntityMeta, ids: &[i64]) -> Result<Vec<Value>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.query_many(&sql::select_by_ids(meta, ids)).await
    }

    async fn find_first_by(&self, meta: &EntityMeta, filters: &[(&str, BindValue)]) -> Result<Option<Value>, AppError> {
        self.query_optional(&sql::select_first_by(meta, filters)).await
    }

    async fn insert(&self, meta: &EntityMeta, record: &Map<String, Value>) -> Result<Value, AppError> {
        self.query_optional(&sql::insert(meta, record))
            .await?
            .ok_or_else(|| AppError::PersistenceFailed(format!("{}: insert returned no row", meta.source)))
    }

    async fn update(&self, meta: &EntityMeta, id: i64, record: &Map<String, Value>) -> Result<Option<Value>, AppError> {
        self.query_optional(&sql::update(meta, id, record)).await
    }

    async fn delete_by_ids(&self, meta: &EntityMeta, ids: &[i64]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let q = sql::delete_by_ids(meta, ids);
        match Self::bind_all(&q).execute(&self.pool).await {
            Ok(done) => Ok(done.rows_affected()),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("23503") => Err(AppError::ValidationFailed(
                vec!["Entry is still referenced by other records".into()],
            )),
            Err(e) => Err(AppError::Db(e)),
        }
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(name) {
        return j;
    }
    Value::Null
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE \"{}\"", db_name.replace('"', "\"\"")))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_url_targets_postgres_database() {
        let (admin, db) = parse_db_name_from_url("postgres://u:p@localhost:5432/phanbook?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(db, "phanbook");
        assert!(parse_db_name_from_url("not a url").is_err());
    }
}
