//! Administrator gate for every backend route.

use crate::cookies;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

pub const LOGIN_PATH: &str = "/oauth/login";
pub const ADMIN_COOKIE: &str = "phanbook_admin";

/// Controllers reachable through the backend at all.
pub const SECURED_CONTROLLERS: &[&str] = &[
    "admin", "template", "posts", "settings", "pages", "users", "tags", "dashboard", "update", "tests", "media",
    "themes",
];

pub fn is_secured_controller(controller: &str) -> bool {
    SECURED_CONTROLLERS.contains(&controller)
}

/// First path segment: `/posts/toggle/3` → `posts`.
pub fn controller_of(path: &str) -> &str {
    path.trim_start_matches('/').split('/').next().unwrap_or("")
}

fn presented_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());
    bearer.or_else(|| cookies::read(headers, ADMIN_COOKIE))
}

/// True when the request carries the configured admin token. Without a configured
/// token nobody is an administrator.
pub fn is_admin(headers: &HeaderMap, admin_token: Option<&str>) -> bool {
    match (admin_token, presented_token(headers)) {
        (Some(expected), Some(given)) => !expected.is_empty() && given == expected,
        _ => false,
    }
}

/// Middleware: administrators on secured controllers pass, everyone else is sent to login.
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let controller = controller_of(&path);
    if !is_admin(request.headers(), state.settings.admin_token.as_deref()) || !is_secured_controller(controller) {
        tracing::warn!(path = %path, "backend access denied");
        return Redirect::to(LOGIN_PATH).into_response();
    }
    next.run(request).await
}
