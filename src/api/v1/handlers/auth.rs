/*
 * Responsibility
 * - POST /v1/api/auth/validate : forward {token} to the auth backend (200 / 401)
 * - POST /v1/api/auth/refresh  : refresh-token cookie → new session cookies
 * - POST /v1/api/auth/logout   : clear both session cookies
 *
 * All three are on the gate's allow-list (the gate must not guard its own endpoints).
 */
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::api::v1::dto::auth::{SuccessResponse, ValidateRequest, ValidateResponse};
use crate::error::AppError;
use crate::services::auth::cookie::parse_cookies;
use crate::services::auth::{SessionCookies, TokenPair};
use crate::state::AppState;

pub async fn validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Result<Response, AppError> {
    let token = req
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::bad_request("MISSING_TOKEN", "token is required"))?;

    let result = state.gate.validate(token).await;
    let (status, valid) = match result {
        Ok(()) => (StatusCode::OK, true),
        Err(err) => {
            tracing::debug!(error = %err, "token rejected by validate route");
            (StatusCode::UNAUTHORIZED, false)
        }
    };

    Ok((status, Json(ValidateResponse { valid })).into_response())
}

pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let tokens = TokenPair::from_cookies(&parse_cookies(&headers));
    let Some(refresh_token) = tokens.refresh_token else {
        return unauthorized_and_cleared(&state.cookies);
    };

    match state.gate.refresh(&refresh_token).await {
        Ok(refreshed) => {
            state.token.set_token(Some(refreshed.access_token.clone()));

            let mut response = Json(SuccessResponse { success: true }).into_response();
            state.cookies.append_refreshed(
                response.headers_mut(),
                &refreshed.access_token,
                refreshed.refresh_token.as_deref(),
            );
            response
        }
        Err(err) => {
            tracing::warn!(error = %err, "refresh route: refresh failed");
            unauthorized_and_cleared(&state.cookies)
        }
    }
}

pub async fn logout(State(state): State<AppState>) -> Response {
    clear_session(&state.cookies)
}

/// Expire both session cookies and acknowledge. Idempotent.
pub fn clear_session(cookies: &SessionCookies) -> Response {
    let mut response = Json(SuccessResponse { success: true }).into_response();
    cookies.append_cleared(response.headers_mut());
    response
}

fn unauthorized_and_cleared(cookies: &SessionCookies) -> Response {
    let mut response = AppError::Unauthorized.into_response();
    cookies.append_cleared(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use axum::http::header;

    use super::*;

    #[test]
    fn clear_session_expires_both_cookies() {
        let cookies = SessionCookies {
            secure: false,
            access_max_age: 3600,
            refresh_max_age: 604800,
        };

        let response = clear_session(&cookies);
        assert_eq!(response.status(), StatusCode::OK);

        let set: Vec<_> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(set.len(), 2);
        assert!(set.iter().any(|c| c.starts_with("access_token=;") && c.contains("Max-Age=0")));
        assert!(set.iter().any(|c| c.starts_with("refresh_token=;") && c.contains("Max-Age=0")));
    }
}
