/*
 * Responsibility
 * - GET /admin, /admin/{*page}: gated page shell (rendering happens client-side)
 */
use axum::{Json, extract::OriginalUri};

use crate::api::v1::dto::pages::PageShell;
use crate::api::v1::extractors::SessionCtxExtractor;

pub async fn admin_page(
    OriginalUri(uri): OriginalUri,
    SessionCtxExtractor(session): SessionCtxExtractor,
) -> Json<PageShell> {
    Json(PageShell {
        page: uri.path().to_string(),
        authenticated: true,
        refreshed: session.refreshed,
    })
}
