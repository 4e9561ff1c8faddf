/*
 * Responsibility
 * - GET /v1/api/proxy/{*path}: forward to the remote REST API with the session's bearer token
 * - Upstream status/body are passed through; transport failure → 502
 */
use axum::{
    extract::{OriginalUri, Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::api::v1::extractors::SessionCtxExtractor;
use crate::error::AppError;
use crate::state::AppState;

pub async fn proxy_get(
    State(state): State<AppState>,
    Path(path): Path<String>,
    OriginalUri(uri): OriginalUri,
    SessionCtxExtractor(session): SessionCtxExtractor,
) -> Result<Response, AppError> {
    let target = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };

    let upstream = state
        .api
        .get(&target, Some(session.access_token.as_str()))
        .await?;

    let content_type = upstream
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok((
        upstream.status,
        [(header::CONTENT_TYPE, content_type)],
        upstream.body,
    )
        .into_response())
}
