//! DDL for the entity tables, derived from each entity's column map.

use crate::error::AppError;
use crate::models::EntityMeta;
use crate::registry::EntityKind;
use sqlx::PgPool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// `CREATE TABLE IF NOT EXISTS` for one entity, one column per column map entry.
pub fn create_table_sql(meta: &EntityMeta) -> String {
    let col_defs: Vec<String> = meta
        .column_map
        .iter()
        .map(|c| format!("{} {}", quote(c.storage), c.sql_type))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote(meta.source),
        col_defs.join(", ")
    )
}

/// Create every entity table that does not exist yet. Existing tables are left as they are.
pub async fn ensure_entity_tables(pool: &PgPool) -> Result<(), AppError> {
    for kind in EntityKind::ALL {
        let ddl = create_table_sql(kind.meta());
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(pool).await?;
    }
    tracing::info!(tables = EntityKind::ALL.len(), "entity tables ensured");
    Ok(())
}
