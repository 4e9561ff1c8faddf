//! Token gate middleware: classify → evaluate → render.
//!
//! - Public paths pass through untouched.
//! - Protected paths are evaluated by [`TokenGate`] and the decision is rendered:
//!   - Allow: downstream response as-is
//!   - AllowWithRefresh: downstream response + refreshed session cookies
//!   - Deny: 307 redirect to the login page with `from=<path>`
//!
//! Rendering starts only after evaluation finished, so a request dropped
//! mid-evaluation never writes cookies or touches the token holder.

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};

use crate::api::v1::extractors::SessionCtx;
use crate::services::auth::cookie::replace_request_access_token;
use crate::services::auth::{GateDecision, IncomingRequest, PathClass, TokenPair};
use crate::state::AppState;

/// Put the token gate in front of every route of `router` (fallback included).
///
/// ```ignore
/// let app = Router::new().merge(pages).fallback(not_found);
/// let app = middleware::auth::gate::apply(app, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, gate_middleware))
}

async fn gate_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = original_uri.path();

    if state.gate.classify(path) == PathClass::Public {
        return next.run(req).await;
    }

    let incoming = IncomingRequest::from_parts(path, req.headers());
    let decision = state.gate.evaluate(&incoming).await;

    render(&state, &incoming, decision, req, next).await
}

async fn render(
    state: &AppState,
    incoming: &IncomingRequest,
    decision: GateDecision,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match decision {
        GateDecision::Allow => {
            tracing::debug!(path = %incoming.path, "gate: allow");
            if let Some(access_token) = TokenPair::from_cookies(&incoming.cookies).access_token {
                req.extensions_mut().insert(SessionCtx::new(access_token, false));
            }
            next.run(req).await
        }
        GateDecision::AllowWithRefresh(tokens) => {
            tracing::info!(
                path = %incoming.path,
                rotated_refresh = tokens.refresh_token.is_some(),
                "gate: access token refreshed"
            );

            replace_request_access_token(req.headers_mut(), &tokens.access_token);
            req.extensions_mut()
                .insert(SessionCtx::new(tokens.access_token.clone(), true));
            state.token.set_token(Some(tokens.access_token.clone()));

            let mut response = next.run(req).await;
            state.cookies.append_refreshed(
                response.headers_mut(),
                &tokens.access_token,
                tokens.refresh_token.as_deref(),
            );
            response
        }
        GateDecision::Deny {
            redirect_to,
            reason,
        } => {
            tracing::info!(
                path = %incoming.path,
                origin = incoming.origin.as_deref().unwrap_or("-"),
                reason = reason.as_str(),
                "gate: redirecting to login"
            );
            Redirect::temporary(&redirect_to).into_response()
        }
    }
}

