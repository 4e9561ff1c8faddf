/// Factory: build the token gate and cookie policy from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{PathClassifier, RemoteAuthBackend, SessionCookies, TokenGate};

/// Routes served by this process that the gate must never guard.
pub const GATE_ENDPOINTS: &[&str] = &[
    "/v1/api/auth/validate",
    "/v1/api/auth/refresh",
    "/v1/api/auth/logout",
];

pub fn build_token_gate(config: &Config) -> Result<Arc<TokenGate>, AppError> {
    let backend = RemoteAuthBackend::new(
        &config.auth_api_base_url,
        &config.auth_validate_path,
        &config.auth_refresh_path,
        config.auth_backend_timeout,
    )
    .map_err(|err| {
        tracing::error!(error = %err, "failed to build auth backend");
        AppError::Internal
    })?;

    // The login page is always public, otherwise a deny would redirect into itself.
    let classifier = PathClassifier::new(config.public_path_prefixes.iter().cloned())
        .with_gate_endpoints(
            GATE_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .chain([config.login_path.clone()]),
        );

    Ok(Arc::new(TokenGate::new(
        classifier,
        Arc::new(backend),
        config.login_path.clone(),
        config.auth_backend_timeout,
    )))
}

pub fn session_cookies(config: &Config) -> SessionCookies {
    SessionCookies {
        secure: config.secure_cookies(),
        access_max_age: config.access_token_max_age_seconds,
        refresh_max_age: config.refresh_token_max_age_seconds,
    }
}
