//! Forum entities. Each entity is a typed row with a storage table and a column map
//! from in-memory field name to storage column name.

mod media;
mod post;
mod tag;
mod user;

pub use media::Media;
pub use post::{Post, POST_TYPE_PAGES};
pub use tag::Tag;
pub use user::User;

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// One entry of a column map.
#[derive(Clone, Copy, Debug)]
pub struct Column {
    /// Field name on the Rust struct.
    pub field: &'static str,
    /// Column name in storage; records are keyed by this name.
    pub storage: &'static str,
    /// PostgreSQL type used when creating the table.
    pub sql_type: &'static str,
}

impl Column {
    pub const fn new(field: &'static str, storage: &'static str, sql_type: &'static str) -> Self {
        Column {
            field,
            storage,
            sql_type,
        }
    }
}

/// Storage metadata shared by all rows of one entity.
#[derive(Debug)]
pub struct EntityMeta {
    pub source: &'static str,
    pub primary_key: &'static str,
    pub column_map: &'static [Column],
}

impl EntityMeta {
    pub fn storage_name(&self, field: &str) -> Option<&'static str> {
        self.column_map.iter().find(|c| c.field == field).map(|c| c.storage)
    }

    pub fn storage_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.column_map.iter().map(|c| c.storage)
    }
}

/// A persisted forum entity.
///
/// Records travel between the store and the entity as JSON objects keyed by storage
/// column, so the serde field names of an implementor must match its column map.
pub trait Entity: Serialize + DeserializeOwned + Default + Send + Sync {
    const META: EntityMeta;

    fn id(&self) -> i64;

    /// Flip a boolean-like (0/1) field. Returns false when the field has no
    /// accessor/mutator pair on this entity.
    fn toggle(&mut self, _field: &str) -> bool {
        false
    }

    /// Messages explaining why the entity cannot be saved as-is.
    fn validation_messages(&self) -> Vec<String> {
        Vec::new()
    }

    fn from_record(record: Value) -> Result<Self, AppError> {
        serde_json::from_value(record).map_err(|e| {
            AppError::PersistenceFailed(format!("{}: malformed record: {}", Self::META.source, e))
        })
    }

    fn to_record(&self) -> Result<Map<String, Value>, AppError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(AppError::PersistenceFailed(format!(
                "{}: entity did not serialize to an object",
                Self::META.source
            ))),
            Err(e) => Err(AppError::PersistenceFailed(e.to_string())),
        }
    }
}

/// Flip a 0/1 flag: zero becomes one, anything else becomes zero.
pub(crate) fn flip(flag: &mut i32) {
    *flag = if *flag == 0 { 1 } else { 0 };
}

#[cfg(test)]
pub(crate) fn assert_column_map_matches_serde<E: Entity>() {
    let record = E::default().to_record().unwrap();
    let mut keys: Vec<&str> = record.keys().map(String::as_str).collect();
    let mut storage: Vec<&str> = E::META.storage_columns().collect();
    keys.sort_unstable();
    storage.sort_unstable();
    assert_eq!(keys, storage, "column map of {} out of sync", E::META.source);
}
