//! HTTP implementation of [`AuthBackend`] against the remote auth API.
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use super::backend::{AuthBackend, BackendError, BackendResult, RefreshedTokens};

#[derive(Debug, Serialize)]
struct ValidateRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    #[serde(alias = "access_token")]
    access_token: String,
    #[serde(default, alias = "refresh_token")]
    refresh_token: Option<String>,
}

/// Calls `POST {base}{validate_path}` and `POST {base}{refresh_path}`.
#[derive(Debug, Clone)]
pub struct RemoteAuthBackend {
    client: reqwest::Client,
    validate_url: Url,
    refresh_url: Url,
}

impl RemoteAuthBackend {
    pub fn new(
        base_url: &Url,
        validate_path: &str,
        refresh_path: &str,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            validate_url: join(base_url, validate_path)?,
            refresh_url: join(base_url, refresh_path)?,
        })
    }
}

// Appends instead of `Url::join` so a base path such as `/v1` is kept.
fn join(base: &Url, path: &str) -> Result<Url, BackendError> {
    Url::parse(&format!("{}{}", base.as_str().trim_end_matches('/'), path))
        .map_err(|e| BackendError::Transport(format!("invalid endpoint {path}: {e}")))
}

fn transport(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Transport(err.to_string())
    }
}

#[async_trait]
impl AuthBackend for RemoteAuthBackend {
    fn backend_name(&self) -> &'static str {
        "remote-http"
    }

    async fn validate(&self, access_token: &str) -> BackendResult<()> {
        let response = self
            .client
            .post(self.validate_url.clone())
            .json(&ValidateRequest {
                token: access_token,
            })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(BackendError::Rejected {
                status: status.as_u16(),
            })
        }
    }

    async fn refresh(&self, refresh_token: &str) -> BackendResult<RefreshedTokens> {
        let response = self
            .client
            .post(self.refresh_url.clone())
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Rejected {
                status: status.as_u16(),
            });
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidBody(e.to_string()))?;

        if body.access_token.trim().is_empty() {
            return Err(BackendError::InvalidBody("empty access token".into()));
        }

        Ok(RefreshedTokens {
            access_token: body.access_token,
            refresh_token: body.refresh_token.filter(|t| !t.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn backend(server: &MockServer) -> RemoteAuthBackend {
        let base = Url::parse(&server.base_url()).unwrap();
        RemoteAuthBackend::new(
            &base,
            "/auth/validate",
            "/auth/refresh",
            Duration::from_secs(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn validate_posts_token_and_accepts_2xx() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/validate")
                .json_body(serde_json::json!({"token": "good"}));
            then.status(204);
        });

        backend(&server).validate("good").await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn validate_maps_non_2xx_to_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/validate");
            then.status(401);
        });

        let err = backend(&server).validate("bad").await.unwrap_err();
        assert!(matches!(err, BackendError::Rejected { status: 401 }));
    }

    #[tokio::test]
    async fn refresh_returns_rotated_tokens() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/refresh")
                .json_body(serde_json::json!({"refreshToken": "r1"}));
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"accessToken":"a2","refreshToken":"r2"}"#);
        });

        let tokens = backend(&server).refresh("r1").await.unwrap();
        assert_eq!(
            tokens,
            RefreshedTokens {
                access_token: "a2".into(),
                refresh_token: Some("r2".into()),
            }
        );
        mock.assert();
    }

    #[tokio::test]
    async fn refresh_accepts_snake_case_without_rotation() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/refresh");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"access_token":"a2"}"#);
        });

        let tokens = backend(&server).refresh("r1").await.unwrap();
        assert_eq!(tokens.access_token, "a2");
        assert_eq!(tokens.refresh_token, None);
    }

    #[tokio::test]
    async fn refresh_with_blank_access_token_is_invalid() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/refresh");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"accessToken":"  "}"#);
        });

        let err = backend(&server).refresh("r1").await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidBody(_)));
    }

    #[test]
    fn endpoints_keep_the_base_path() {
        let base = Url::parse("https://api.example.com/v1/").unwrap();
        let url = join(&base, "/auth/validate").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/auth/validate");
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        let backend = RemoteAuthBackend::new(
            &base,
            "/auth/validate",
            "/auth/refresh",
            Duration::from_secs(2),
        )
        .unwrap();

        let err = backend.validate("tok").await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::Transport(_) | BackendError::Timeout
        ));
    }
}
