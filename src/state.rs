//! Shared application state for all routes. Grids are loaded once at startup.

use crate::config::GridRegistry;
use crate::settings::Settings;
use crate::store::EntityStore;
use crate::theme::Theme;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub grids: Arc<GridRegistry>,
    pub theme: Arc<Theme>,
    pub settings: Arc<Settings>,
}
