//! Token gate: per-request access/refresh state machine.
//!
//! Start → (no access token) Deny
//!       → Validating → ok: Allow
//!                    → err: RefreshCheck → (no refresh token) Deny
//!                                        → Refreshing → ok: AllowWithRefresh
//!                                                     → err: Deny
//!
//! At most one Validate and one Refresh call per request, in that order.
//! Collaborator errors (including timeouts) never escape `evaluate`.
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::backend::{AuthBackend, BackendError, BackendResult, RefreshedTokens};
use super::classifier::{PathClass, PathClassifier};
use super::cookie::{TokenPair, is_cookie_value};
use super::decision::{DenyReason, GateDecision, IncomingRequest, login_redirect};

#[derive(Clone)]
pub struct TokenGate {
    classifier: PathClassifier,
    backend: Arc<dyn AuthBackend>,
    login_path: String,
    call_timeout: Duration,
}

impl std::fmt::Debug for TokenGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGate")
            .field("classifier", &self.classifier)
            .field("backend", &self.backend.backend_name())
            .field("login_path", &self.login_path)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

impl TokenGate {
    pub fn new(
        classifier: PathClassifier,
        backend: Arc<dyn AuthBackend>,
        login_path: impl Into<String>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            backend,
            login_path: login_path.into(),
            call_timeout,
        }
    }

    pub fn classify(&self, path: &str) -> PathClass {
        self.classifier.classify(path)
    }

    /// Validate call bounded by the per-call timeout.
    pub async fn validate(&self, access_token: &str) -> BackendResult<()> {
        self.bounded(self.backend.validate(access_token)).await
    }

    /// Refresh call bounded by the per-call timeout.
    ///
    /// Minted tokens end up in `Set-Cookie`, so values that are not valid
    /// cookie values count as an invalid body.
    pub async fn refresh(&self, refresh_token: &str) -> BackendResult<RefreshedTokens> {
        let refreshed = self.bounded(self.backend.refresh(refresh_token)).await?;
        let rotated = refreshed.refresh_token.as_deref().unwrap_or_default();
        if !is_cookie_value(&refreshed.access_token) || !is_cookie_value(rotated) {
            return Err(BackendError::InvalidBody(
                "token is not a valid cookie value".into(),
            ));
        }
        Ok(refreshed)
    }

    pub async fn evaluate(&self, request: &IncomingRequest) -> GateDecision {
        let tokens = TokenPair::from_cookies(&request.cookies);

        let Some(access_token) = tokens.access_token.as_deref() else {
            return self.deny(request, DenyReason::MissingToken);
        };

        match self.validate(access_token).await {
            Ok(()) => return GateDecision::Allow,
            Err(err) => {
                tracing::debug!(
                    path = %request.path,
                    backend = self.backend.backend_name(),
                    error = %err,
                    "access token validation failed"
                );
            }
        }

        let Some(refresh_token) = tokens.refresh_token.as_deref() else {
            return self.deny(request, DenyReason::MissingRefreshToken);
        };

        match self.refresh(refresh_token).await {
            Ok(refreshed) => GateDecision::AllowWithRefresh(refreshed),
            Err(err) => {
                tracing::warn!(
                    path = %request.path,
                    backend = self.backend.backend_name(),
                    error = %err,
                    "token refresh failed"
                );
                self.deny(request, DenyReason::RefreshFailed)
            }
        }
    }

    async fn bounded<T, F>(&self, call: F) -> BackendResult<T>
    where
        F: Future<Output = BackendResult<T>>,
    {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .unwrap_or(Err(BackendError::Timeout))
    }

    fn deny(&self, request: &IncomingRequest, reason: DenyReason) -> GateDecision {
        GateDecision::Deny {
            redirect_to: login_redirect(&self.login_path, &request.path),
            reason,
        }
    }
}
