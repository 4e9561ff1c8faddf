//! Session cookies: parsing the `Cookie` header and building `Set-Cookie` values.
//!
//! The gate, the refresh route and the logout route all go through
//! [`SessionCookies`], so a clear always expires exactly what the gate accepts.

use std::collections::HashMap;

use axum::http::{HeaderMap, HeaderValue, header};

/// Cookie name for the access token (short-lived).
pub const ACCESS_COOKIE_NAME: &str = "access_token";

/// Cookie name for the refresh token (long-lived).
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// Parse every `Cookie` header into a name → value map.
///
/// The first occurrence of a name wins (browsers list the most specific path first).
pub fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else {
            continue;
        };
        for part in raw.split(';') {
            if let Some((key, value)) = part.trim().split_once('=') {
                let key = key.trim();
                if !key.is_empty() {
                    cookies
                        .entry(key.to_string())
                        .or_insert_with(|| value.trim().to_string());
                }
            }
        }
    }
    cookies
}

/// Access/refresh tokens as read from the request cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl TokenPair {
    /// Blank values count as absent.
    pub fn from_cookies(cookies: &HashMap<String, String>) -> Self {
        Self {
            access_token: non_blank(cookies.get(ACCESS_COOKIE_NAME)),
            refresh_token: non_blank(cookies.get(REFRESH_COOKIE_NAME)),
        }
    }
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Attributes shared by every session cookie this service writes.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookies {
    pub secure: bool,
    pub access_max_age: u64,
    pub refresh_max_age: u64,
}

/// RFC 6265 `cookie-octet`: visible ASCII except `"`, `,`, `;` and `\`.
pub fn is_cookie_value(value: &str) -> bool {
    value
        .bytes()
        .all(|b| matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E))
}

impl SessionCookies {
    /// `None` when `token` is not a valid cookie value.
    pub fn access(&self, token: &str) -> Option<String> {
        self.build(ACCESS_COOKIE_NAME, token, self.access_max_age)
    }

    pub fn refresh(&self, token: &str) -> Option<String> {
        self.build(REFRESH_COOKIE_NAME, token, self.refresh_max_age)
    }

    /// `Set-Cookie` values expiring both session cookies.
    pub fn cleared(&self) -> [String; 2] {
        [
            self.format(ACCESS_COOKIE_NAME, "", 0),
            self.format(REFRESH_COOKIE_NAME, "", 0),
        ]
    }

    /// Append `Set-Cookie` for a refreshed session. The refresh cookie is only
    /// rewritten when a new refresh token was issued. Values that are not valid
    /// cookie values are dropped.
    pub fn append_refreshed(
        &self,
        headers: &mut HeaderMap,
        access_token: &str,
        refresh_token: Option<&str>,
    ) {
        let cookies = std::iter::once((ACCESS_COOKIE_NAME, self.access(access_token)))
            .chain(refresh_token.map(|t| (REFRESH_COOKIE_NAME, self.refresh(t))));
        for (name, cookie) in cookies {
            match cookie {
                Some(cookie) => append_set_cookie(headers, &cookie),
                None => tracing::warn!(cookie = name, "dropping session cookie with unsafe value"),
            }
        }
    }

    pub fn append_cleared(&self, headers: &mut HeaderMap) {
        for cookie in self.cleared() {
            append_set_cookie(headers, &cookie);
        }
    }

    fn build(&self, name: &str, value: &str, max_age: u64) -> Option<String> {
        is_cookie_value(value).then(|| self.format(name, value, max_age))
    }

    fn format(&self, name: &str, value: &str, max_age: u64) -> String {
        let secure = if self.secure { "; Secure" } else { "" };
        format!(
            "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}{}",
            name, value, max_age, secure
        )
    }
}

fn append_set_cookie(headers: &mut HeaderMap, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            headers.append(header::SET_COOKIE, value);
        }
        Err(_) => tracing::warn!("dropping session cookie with non-header-safe value"),
    }
}

/// Rewrite the request's `Cookie` header so the access cookie carries `access_token`.
///
/// Used after a refresh so handlers behind the gate see the new token.
pub fn replace_request_access_token(headers: &mut HeaderMap, access_token: &str) {
    let mut cookies = parse_cookies(headers);
    cookies.insert(ACCESS_COOKIE_NAME.to_string(), access_token.to_string());

    let mut pairs: Vec<_> = cookies.into_iter().collect();
    pairs.sort();
    let joined = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("; ");

    if let Ok(value) = HeaderValue::from_str(&joined) {
        headers.remove(header::COOKIE);
        headers.insert(header::COOKIE, value);
    }
}
