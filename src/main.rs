//! Backend server: loads grid definitions, ensures the database and entity tables exist,
//! and serves the common and backend routes.

use phanbook_admin::{
    app, ensure_database_exists, ensure_entity_tables, load_from_dir, resolve, AppState, PgStore, Settings, Theme,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("phanbook_admin=info".parse()?))
        .init();

    let settings = Settings::from_env();
    if settings.admin_token.is_none() {
        tracing::warn!("PHANBOOK_ADMIN_TOKEN is not set; every backend request will be redirected to login");
    }

    ensure_database_exists(&settings.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;
    ensure_entity_tables(&pool).await?;

    let grids = resolve(&load_from_dir(&settings.grid_dir).await?)?;
    tracing::info!(grids = ?grids.controllers().collect::<Vec<_>>(), "grids loaded");

    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        grids: Arc::new(grids),
        theme: Arc::new(Theme::new(settings.root.clone(), settings.theme.clone())),
        settings: Arc::new(settings.clone()),
    };

    let listener = TcpListener::bind(&settings.listen).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
