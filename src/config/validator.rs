//! Grid config validation: identifiers, join types and entity references.

use crate::config::GridConfig;
use crate::error::ConfigError;
use crate::registry::EntityKind;
use crate::sql::{is_qualified_identifier, is_safe_expression};
use std::collections::HashSet;

/// Entity listed by a grid: explicit `model`, else the entity of the controller route.
pub fn grid_entity(config: &GridConfig) -> Result<EntityKind, ConfigError> {
    match &config.model {
        Some(model) => EntityKind::from_model_name(model),
        None => EntityKind::from_route(&config.controller),
    }
    .ok_or_else(|| {
        ConfigError::Validation(format!(
            "grid '{}': no entity for model '{}'",
            config.controller,
            config.model.as_deref().unwrap_or(&config.controller)
        ))
    })
}

pub fn validate(configs: &[GridConfig]) -> Result<(), ConfigError> {
    let mut controllers = HashSet::new();
    for config in configs {
        if !controllers.insert(config.controller.as_str()) {
            return Err(ConfigError::DuplicateController(config.controller.clone()));
        }
        validate_one(config)?;
    }
    Ok(())
}

fn validate_one(config: &GridConfig) -> Result<(), ConfigError> {
    let controller = config.controller.as_str();
    let invalid = |value: &str| ConfigError::InvalidIdentifier {
        controller: controller.to_string(),
        value: value.to_string(),
    };

    if !is_qualified_identifier(controller) || controller.contains('.') {
        return Err(invalid(controller));
    }
    grid_entity(config)?;

    let mut keys = HashSet::new();
    for column in &config.grid {
        if !is_qualified_identifier(&column.key) || column.key.contains('.') {
            return Err(invalid(&column.key));
        }
        if !keys.insert(column.key.as_str()) {
            return Err(ConfigError::Validation(format!(
                "grid '{}': duplicate column key '{}'",
                controller, column.key
            )));
        }
        for expr in [&column.order_key, &column.filter_key].into_iter().flatten() {
            if !is_safe_expression(expr) {
                return Err(invalid(expr));
            }
        }
    }

    let query = &config.query;
    for expr in query.columns.iter().chain(query.group_by.iter()).chain(query.where_.iter()) {
        if !is_safe_expression(expr) {
            return Err(invalid(expr));
        }
    }
    for join in &query.joins {
        if crate::config::JoinKind::from_config(&join.join_type).is_none() {
            return Err(ConfigError::UnknownJoinType {
                controller: controller.to_string(),
                join_type: join.join_type.clone(),
            });
        }
        if EntityKind::from_model_name(&join.model).is_none() {
            return Err(ConfigError::Validation(format!(
                "grid '{}': join references unknown model '{}'",
                controller, join.model
            )));
        }
        if !is_qualified_identifier(&join.alias) || join.alias.contains('.') {
            return Err(invalid(&join.alias));
        }
        if !is_safe_expression(&join.on) {
            return Err(invalid(&join.on));
        }
    }
    Ok(())
}
