//! In-memory `EntityStore` for unit and handler tests.

use crate::error::AppError;
use crate::models::{Entity, EntityMeta};
use crate::sql::{BindValue, QueryBuf};
use crate::store::EntityStore;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::Mutex;

/// Rows per table keyed by id. Grid queries are recorded and answered with every
/// row of the listed table.
pub struct MemoryStore {
    pub tables: Mutex<HashMap<&'static str, BTreeMap<i64, Map<String, Value>>>>,
    pub grid_queries: Mutex<Vec<QueryBuf>>,
    fail_writes: bool,
    next_id: AtomicI64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            grid_queries: Mutex::new(Vec::new()),
            fail_writes: false,
            next_id: AtomicI64::new(1000),
        }
    }
}

impl MemoryStore {
    /// Store whose inserts, updates and deletes fail with `PersistenceFailed`.
    pub fn read_only() -> Self {
        MemoryStore {
            fail_writes: true,
            ..MemoryStore::default()
        }
    }

    pub async fn seed<E: Entity>(&self, entity: &E) {
        let record = entity.to_record().unwrap();
        self.tables
            .lock()
            .await
            .entry(E::META.source)
            .or_default()
            .insert(entity.id(), record);
    }

    pub async fn get<E: Entity>(&self, id: i64) -> Option<E> {
        let tables = self.tables.lock().await;
        let record = tables.get(E::META.source)?.get(&id)?.clone();
        Some(E::from_record(Value::Object(record)).unwrap())
    }

    pub async fn count(&self, meta: &EntityMeta) -> usize {
        self.tables.lock().await.get(meta.source).map_or(0, BTreeMap::len)
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes {
            return Err(AppError::PersistenceFailed("storage is read-only".into()));
        }
        Ok(())
    }
}

fn matches(record: &Map<String, Value>, column: &str, value: &BindValue) -> bool {
    let Some(stored) = record.get(column) else {
        return false;
    };
    match value {
        BindValue::Null => stored.is_null(),
        BindValue::Bool(b) => stored.as_bool() == Some(*b),
        BindValue::I64(n) => stored.as_i64() == Some(*n),
        BindValue::String(s) => stored.as_str() == Some(s.as_str()),
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn fetch_grid(&self, meta: &EntityMeta, query: &QueryBuf) -> Result<Vec<Value>, AppError> {
        self.grid_queries.lock().await.push(QueryBuf {
            sql: query.sql.clone(),
            params: query.params.clone(),
        });
        let tables = self.tables.lock().await;
        Ok(tables
            .get(meta.source)
            .map(|rows| rows.values().cloned().map(Value::Object).collect())
            .unwrap_or_default())
    }

    async fn find_by_id(&self, meta: &EntityMeta, id: i64) -> Result<Option<Value>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.get(meta.source).and_then(|rows| rows.get(&id)).cloned().map(Value::Object))
    }

    async fn find_by_ids(&self, meta: &EntityMeta, ids: &[i64]) -> Result<Vec<Value>, AppError> {
        let tables = self.tables.lock().await;
        let Some(rows) = tables.get(meta.source) else {
            return Ok(Vec::new());
        };
        Ok(rows
            .iter()
            .filter(|(id, _)| ids.contains(id))
            .map(|(_, r)| Value::Object(r.clone()))
            .collect())
    }

    async fn find_first_by(&self, meta: &EntityMeta, filters: &[(&str, BindValue)]) -> Result<Option<Value>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.get(meta.source).and_then(|rows| {
            rows.values()
                .find(|r| filters.iter().all(|(col, val)| matches(r, col, val)))
                .cloned()
                .map(Value::Object)
        }))
    }

    async fn insert(&self, meta: &EntityMeta, record: &Map<String, Value>) -> Result<Value, AppError> {
        self.check_writable()?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut stored = record.clone();
        stored.insert(meta.primary_key.to_string(), Value::from(id));
        self.tables
            .lock()
            .await
            .entry(meta.source)
            .or_default()
            .insert(id, stored.clone());
        Ok(Value::Object(stored))
    }

    async fn update(&self, meta: &EntityMeta, id: i64, record: &Map<String, Value>) -> Result<Option<Value>, AppError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().await;
        let Some(existing) = tables.get_mut(meta.source).and_then(|rows| rows.get_mut(&id)) else {
            return Ok(None);
        };
        for (k, v) in record {
            if k != meta.primary_key {
                existing.insert(k.clone(), v.clone());
            }
        }
        Ok(Some(Value::Object(existing.clone())))
    }

    async fn delete_by_ids(&self, meta: &EntityMeta, ids: &[i64]) -> Result<u64, AppError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().await;
        let Some(rows) = tables.get_mut(meta.source) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|id, _| !ids.contains(id));
        Ok((before - rows.len()) as u64)
    }
}
