//! Generic entity operations on top of an `EntityStore`.

use crate::error::AppError;
use crate::models::{Entity, Media, Post, Tag, User};
use crate::registry::EntityKind;
use crate::store::EntityStore;
use serde_json::Value;

pub const ENTRY_NOT_FOUND: &str = "Entry was not found";

pub struct CrudService;

impl CrudService {
    /// Load one entity by primary key.
    pub async fn find<E: Entity>(store: &dyn EntityStore, id: i64) -> Result<Option<E>, AppError> {
        store.find_by_id(&E::META, id).await?.map(E::from_record).transpose()
    }

    /// First entity whose storage columns equal the given values.
    pub async fn find_first_by<E: Entity>(
        store: &dyn EntityStore,
        filters: &[(&str, crate::sql::BindValue)],
    ) -> Result<Option<E>, AppError> {
        store.find_first_by(&E::META, filters).await?.map(E::from_record).transpose()
    }

    /// Insert (id 0) or update an entity after checking its own validation rules.
    /// Returns the entity as stored.
    pub async fn save<E: Entity>(store: &dyn EntityStore, entity: &E) -> Result<E, AppError> {
        let messages = entity.validation_messages();
        if !messages.is_empty() {
            return Err(AppError::ValidationFailed(messages));
        }
        let record = entity.to_record()?;
        let stored: Value = if entity.id() == 0 {
            store.insert(&E::META, &record).await?
        } else {
            store
                .update(&E::META, entity.id(), &record)
                .await?
                .ok_or_else(|| AppError::NotFound(ENTRY_NOT_FOUND.into()))?
        };
        E::from_record(stored)
    }

    /// Flip a 0/1 field of the row `id` of `kind` and persist it.
    pub async fn toggle(store: &dyn EntityStore, kind: EntityKind, id: i64, field: &str) -> Result<(), AppError> {
        match kind {
            EntityKind::Posts => toggle_entity::<Post>(store, id, field).await,
            EntityKind::Media => toggle_entity::<Media>(store, id, field).await,
            EntityKind::Users => toggle_entity::<User>(store, id, field).await,
            EntityKind::Tags => toggle_entity::<Tag>(store, id, field).await,
        }
    }

    /// Delete the existing rows among `ids`. Fails with `NotFound` when none exist.
    pub async fn delete(store: &dyn EntityStore, kind: EntityKind, ids: &[i64]) -> Result<u64, AppError> {
        let meta = kind.meta();
        if ids.is_empty() {
            return Err(AppError::NotFound(ENTRY_NOT_FOUND.into()));
        }
        let found: Vec<i64> = store
            .find_by_ids(meta, ids)
            .await?
            .iter()
            .filter_map(|row| row.get(meta.primary_key).and_then(Value::as_i64))
            .collect();
        if found.is_empty() {
            return Err(AppError::NotFound(ENTRY_NOT_FOUND.into()));
        }
        let deleted = store.delete_by_ids(meta, &found).await?;
        tracing::info!(entity = meta.source, ids = ?found, deleted, "entries deleted");
        Ok(deleted)
    }
}

async fn toggle_entity<E: Entity>(store: &dyn EntityStore, id: i64, field: &str) -> Result<(), AppError> {
    let mut entity: E = CrudService::find(store, id)
        .await?
        .ok_or_else(|| AppError::NotFound(ENTRY_NOT_FOUND.into()))?;
    if !entity.toggle(field) {
        return Err(AppError::BadRequest(format!("{} has no toggleable field '{}'", E::META.source, field)));
    }
    let record = entity.to_record()?;
    store
        .update(&E::META, id, &record)
        .await?
        .ok_or_else(|| AppError::NotFound(ENTRY_NOT_FOUND.into()))?;
    tracing::info!(entity = E::META.source, id, field, "entry toggled");
    Ok(())
}
