//! Shared fixtures: an in-process auth backend and a fully layered router.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use url::Url;

use portal_gate::app::build_router;
use portal_gate::config::DEFAULT_PUBLIC_PREFIXES;
use portal_gate::middleware::http::HttpLimits;
use portal_gate::services::api_client::ApiClient;
use portal_gate::services::auth::{
    AuthBackend, BackendError, BackendResult, GATE_ENDPOINTS, PathClassifier, RefreshedTokens,
    SessionCookies, TokenGate,
};
use portal_gate::services::token::TokenHolder;
use portal_gate::state::AppState;

/// Backend answering from fixed token tables.
#[derive(Default)]
pub struct FakeBackend {
    valid: Mutex<HashSet<String>>,
    refreshable: Mutex<HashMap<String, RefreshedTokens>>,
    pub validate_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn accept(self: &Arc<Self>, access_token: &str) -> Arc<Self> {
        self.valid.lock().unwrap().insert(access_token.to_string());
        self.clone()
    }

    pub fn refreshes(
        self: &Arc<Self>,
        refresh_token: &str,
        access_token: &str,
        rotated: Option<&str>,
    ) -> Arc<Self> {
        self.refreshable.lock().unwrap().insert(
            refresh_token.to_string(),
            RefreshedTokens {
                access_token: access_token.to_string(),
                refresh_token: rotated.map(str::to_string),
            },
        );
        self.clone()
    }

    pub fn validate_calls(&self) -> usize {
        self.validate_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthBackend for FakeBackend {
    fn backend_name(&self) -> &'static str {
        "fake"
    }

    async fn validate(&self, access_token: &str) -> BackendResult<()> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        if self.valid.lock().unwrap().contains(access_token) {
            Ok(())
        } else {
            Err(BackendError::Rejected { status: 401 })
        }
    }

    async fn refresh(&self, refresh_token: &str) -> BackendResult<RefreshedTokens> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refreshable
            .lock()
            .unwrap()
            .get(refresh_token)
            .cloned()
            .ok_or(BackendError::Rejected { status: 401 })
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn app(backend: Arc<FakeBackend>) -> TestApp {
    app_with_api(backend, Url::parse("http://127.0.0.1:9/api").unwrap())
}

pub fn app_with_api(backend: Arc<FakeBackend>, api_base: Url) -> TestApp {
    let classifier = PathClassifier::new(DEFAULT_PUBLIC_PREFIXES.iter().copied())
        .with_gate_endpoints(GATE_ENDPOINTS.iter().copied().chain(["/login"]));
    let gate = Arc::new(TokenGate::new(
        classifier,
        backend,
        "/login",
        Duration::from_millis(500),
    ));
    let cookies = SessionCookies {
        secure: false,
        access_max_age: 3600,
        refresh_max_age: 604800,
    };
    let token = TokenHolder::new();
    let api = ApiClient::new(api_base, Duration::from_secs(2), token.clone()).unwrap();

    let state = AppState::new(gate, cookies, token, api);
    let router = build_router(
        state.clone(),
        HttpLimits {
            timeout: Duration::from_secs(5),
            body_limit_bytes: 1024 * 1024,
        },
    );

    TestApp { router, state }
}

pub fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(path: &str, cookie: Option<&str>, json: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(json.to_string())).unwrap()
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string())
}

/// Turn `Set-Cookie` values into the `Cookie` header a browser would send next.
pub fn cookie_header_from(set_cookies: &[String]) -> String {
    set_cookies
        .iter()
        .filter_map(|c| c.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
