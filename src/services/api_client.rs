//! Client for the remote REST API (projects, investments, pledges, content, ...).
//!
//! Reads the bearer token from the injected [`TokenHolder`] unless the caller
//! supplies one for the current request.
use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;
use url::Url;

use crate::services::token::TokenHolder;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("invalid api path: {0}")]
    InvalidPath(String),
    #[error("api transport error: {0}")]
    Transport(String),
}

/// Raw upstream response, forwarded as-is by the proxy.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: TokenHolder,
}

impl ApiClient {
    pub fn new(base_url: Url, timeout: Duration, token: TokenHolder) -> Result<Self, ApiClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Resolve `path_and_query` below the base URL.
    ///
    /// Each segment is re-encoded onto the base path. Dot segments (plain or
    /// percent-encoded) and backslashes are rejected.
    pub fn url_for(&self, path_and_query: &str) -> Result<Url, ApiClientError> {
        let invalid = || ApiClientError::InvalidPath(path_and_query.to_string());

        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path_and_query, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.iter().any(|s| is_dot_segment(s) || s.contains('\\')) {
            return Err(invalid());
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        url.set_query(query);

        if !url.path().starts_with(self.base_url.path().trim_end_matches('/')) {
            return Err(invalid());
        }
        Ok(url)
    }

    pub async fn get(
        &self,
        path_and_query: &str,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ApiClientError> {
        let url = self.url_for(path_and_query)?;

        let mut request = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");

        let token = bearer.map(str::to_string).or_else(|| self.token.get_token());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiClientError::Transport(e.to_string()))?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiClientError::Transport(e.to_string()))?
            .to_vec();

        Ok(ApiResponse {
            status,
            content_type,
            body,
        })
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().replace("%2e", ".").as_str(),
        "." | ".."
    )
}
