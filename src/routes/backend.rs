//! Backend routes. Every route passes the administrator gate.

use crate::auth::require_admin;
use crate::handlers::{
    delete_many, delete_one, form_edit, form_new, list, save, save_options, show_options, submit, toggle,
};
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

pub fn backend_routes(state: AppState) -> Router {
    Router::new()
        .route("/:controller", get(list))
        .route("/:controller/grid", post(submit))
        .route("/:controller/toggle/:id", get(toggle).post(toggle))
        .route("/:controller/delete", post(delete_many))
        .route("/:controller/delete/:id", get(delete_one).post(delete_one))
        .route("/:controller/form", get(form_new))
        .route("/:controller/form/:id", get(form_edit))
        .route("/:controller/save", post(save))
        .route("/:controller/options", get(show_options).post(save_options))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES)))
        .with_state(state)
}
