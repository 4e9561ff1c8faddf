//! Request snapshot and gate outcome types.
use std::collections::HashMap;

use axum::http::{HeaderMap, header};

use super::backend::RefreshedTokens;
use super::cookie::parse_cookies;

/// Query parameter carrying the originally requested path on a login redirect.
pub const RETURN_TO_PARAM: &str = "from";

/// What the gate needs to know about one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingRequest {
    pub path: String,
    pub cookies: HashMap<String, String>,
    pub origin: Option<String>,
}

impl IncomingRequest {
    pub fn from_parts(path: &str, headers: &HeaderMap) -> Self {
        Self {
            path: path.to_string(),
            cookies: parse_cookies(headers),
            origin: headers
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }
}

/// Why a protected request was sent to the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    MissingToken,
    MissingRefreshToken,
    RefreshFailed,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::MissingToken => "missing_token",
            DenyReason::MissingRefreshToken => "missing_refresh_token",
            DenyReason::RefreshFailed => "refresh_failed",
        }
    }
}

/// Terminal outcome of one gate evaluation.
///
/// Only `Deny` carries a redirect and only `AllowWithRefresh` carries tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    AllowWithRefresh(RefreshedTokens),
    Deny {
        redirect_to: String,
        reason: DenyReason,
    },
}

/// `{login_path}?from={percent-encoded original path}`.
pub fn login_redirect(login_path: &str, original_path: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(original_path.as_bytes()).collect();
    format!("{login_path}?{RETURN_TO_PARAM}={encoded}")
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn redirect_encodes_the_original_path() {
        assert_eq!(
            login_redirect("/login", "/admin/dashboard"),
            "/login?from=%2Fadmin%2Fdashboard"
        );
    }

    #[test]
    fn redirect_encodes_reserved_characters() {
        assert_eq!(
            login_redirect("/login", "/projects/a b&c"),
            "/login?from=%2Fprojects%2Fa+b%26c"
        );
    }

    #[test]
    fn snapshot_reads_cookies_and_host() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("portal.example"));
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token=a"));

        let request = IncomingRequest::from_parts("/admin", &headers);
        assert_eq!(request.path, "/admin");
        assert_eq!(request.origin.as_deref(), Some("portal.example"));
        assert_eq!(
            request.cookies.get("access_token").map(String::as_str),
            Some("a")
        );
    }
}
