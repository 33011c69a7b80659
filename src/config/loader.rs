//! Load grid configs from JSON files and resolve them into a [`GridRegistry`].

use crate::config::resolved::{GridColumn, GridJoin, GridQuery, GridRegistry, GridSpec, JoinKind, Sanitize};
use crate::config::types::GridConfig;
use crate::config::validator::{grid_entity, validate};
use crate::error::ConfigError;
use crate::registry::EntityKind;
use std::path::Path;

/// Build the registry from raw configs (validates first).
pub fn resolve(configs: &[GridConfig]) -> Result<GridRegistry, ConfigError> {
    validate(configs)?;
    let mut specs = Vec::with_capacity(configs.len());
    for config in configs {
        specs.push(resolve_one(config)?);
    }
    Ok(GridRegistry::new(specs))
}

fn resolve_one(config: &GridConfig) -> Result<GridSpec, ConfigError> {
    let entity = grid_entity(config)?;
    let grid = config
        .grid
        .iter()
        .map(|c| GridColumn {
            key: c.key.clone(),
            title: c.title.clone().unwrap_or_else(|| c.key.clone()),
            order_key: c.order_key.clone(),
            filter_key: c.filter_key.clone(),
            filterable: c.filter.is_some(),
            sanitize: Sanitize::from_config(c.filter.as_ref().and_then(|f| f.sanitize.as_deref())),
            widget: c.filter.as_ref().and_then(|f| f.widget.clone()),
            values: c.filter.as_ref().map(|f| f.values.clone()).unwrap_or_default(),
            having: c.having,
        })
        .collect();

    let mut joins = Vec::with_capacity(config.query.joins.len());
    for join in &config.query.joins {
        let kind = JoinKind::from_config(&join.join_type).ok_or_else(|| ConfigError::UnknownJoinType {
            controller: config.controller.clone(),
            join_type: join.join_type.clone(),
        })?;
        let joined = EntityKind::from_model_name(&join.model).ok_or_else(|| {
            ConfigError::Validation(format!("unknown join model '{}'", join.model))
        })?;
        joins.push(GridJoin {
            kind,
            entity: joined,
            on: join.on.clone(),
            alias: join.alias.clone(),
        });
    }

    Ok(GridSpec {
        controller: config.controller.clone(),
        entity,
        grid,
        query: GridQuery {
            columns: config.query.columns.clone(),
            joins,
            group_by: config.query.group_by.clone(),
            where_: config.query.where_.clone().filter(|w| !w.trim().is_empty()),
        },
    })
}

/// Read every `*.json` file in `dir` as one [`GridConfig`], sorted by file name.
pub async fn load_from_dir(dir: &Path) -> Result<Vec<GridConfig>, ConfigError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", dir.display(), e)))?;
    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ConfigError::Load(e.to_string()))?
    {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut configs = Vec::with_capacity(paths.len());
    for path in paths {
        tracing::debug!(path = %path.display(), "loading grid config");
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
        let config: GridConfig = serde_json::from_str(&text)
            .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
        configs.push(config);
    }
    Ok(configs)
}
