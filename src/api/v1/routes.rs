/*
 * Responsibility
 * - URL structure of the portal surface
 * - Public: /health, /v1/api/auth/{validate,refresh,logout}
 * - Gated: /admin, /admin/{*page}, /v1/api/proxy/{*path}
 * - Which paths are gated is decided by the allow-list, not by the route table
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    auth::{logout, refresh, validate},
    health::health,
    pages::admin_page,
    proxy::proxy_get,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/v1/api/auth/validate", post(validate))
        .route("/v1/api/auth/refresh", post(refresh))
        .route("/v1/api/auth/logout", post(logout))
        .route("/admin", get(admin_page))
        .route("/admin/{*page}", get(admin_page))
        .route("/v1/api/proxy/{*path}", get(proxy_get))
}
