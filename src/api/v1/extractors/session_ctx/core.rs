use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use super::SessionCtx;

/// Extractor for handlers behind the token gate.
/// Assumes the gate already inserted `SessionCtx` into the request extensions;
/// returns 401 when it is missing (route not gated / middleware not applied).
pub struct SessionCtxExtractor(pub SessionCtx);

impl<S> FromRequestParts<S> for SessionCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionCtx>()
            .cloned()
            .map(SessionCtxExtractor)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

