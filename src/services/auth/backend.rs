//! Validate/Refresh collaborator interface used by the token gate.
use async_trait::async_trait;
use thiserror::Error;

pub type BackendResult<T> = Result<T, BackendError>;

/// Failures of the remote auth collaborator.
///
/// The gate never surfaces these to the end user; every variant collapses
/// into the next state-machine transition.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("auth backend rejected the token (status {status})")]
    Rejected { status: u16 },
    #[error("auth backend transport error: {0}")]
    Transport(String),
    #[error("auth backend timed out")]
    Timeout,
    #[error("auth backend returned an invalid body: {0}")]
    InvalidBody(String),
}

/// Tokens minted by a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedTokens {
    pub access_token: String,
    /// Present only when the backend rotated the refresh token.
    pub refresh_token: Option<String>,
}

/// Remote token authority.
///
/// Implementations must be cheap to share (`Arc<dyn AuthBackend>`).
#[async_trait]
pub trait AuthBackend: Send + Sync + 'static {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // `Ok(())` iff the access token is currently valid.
    async fn validate(&self, access_token: &str) -> BackendResult<()>;

    // Exchange a refresh token for a new access token (and maybe a new refresh token).
    async fn refresh(&self, refresh_token: &str) -> BackendResult<RefreshedTokens>;
}
