mod backend;
mod common;

pub use backend::backend_routes;
pub use common::common_routes;

use crate::state::AppState;
use axum::Router;

/// Common routes plus the gated backend, ready to serve.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(backend_routes(state))
}
