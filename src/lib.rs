//! Phanbook admin backend: grid lists with cookie-persisted filters, generic entity
//! actions, post forms and theme options, served over axum.

pub mod auth;
pub mod config;
pub mod cookies;
pub mod error;
pub mod extractors;
pub mod flash;
pub mod forms;
pub mod grid;
pub mod handlers;
pub mod migration;
pub mod models;
pub mod registry;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;
pub mod theme;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{load_from_dir, resolve, GridRegistry, GridSpec};
pub use error::{AppError, ConfigError};
pub use migration::ensure_entity_tables;
pub use registry::EntityKind;
pub use routes::{app, backend_routes, common_routes};
pub use service::{CrudService, SiteService};
pub use settings::Settings;
pub use state::AppState;
pub use store::{ensure_database_exists, EntityStore, PgStore};
pub use theme::{Theme, ThemeInfo};
