/*
 * Responsibility
 * - Load settings from environment variables (auth API, cookie lifetimes, allow-list, ...)
 * - Validate values (fail start-up when something required is missing or malformed)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Path prefixes that bypass the token gate unless `PUBLIC_PATH_PREFIXES` overrides them.
pub const DEFAULT_PUBLIC_PREFIXES: &[&str] = &[
    "/login",
    "/register",
    "/forgot-password",
    "/about",
    "/faq",
    "/careers",
    "/blog",
    "/_next",
    "/static",
    "/assets",
    "/favicon.ico",
    "/robots.txt",
    "/health",
    "/v1/api/public",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Remote auth API (Validate / Refresh collaborator)
    pub auth_api_base_url: Url,
    pub auth_validate_path: String,
    pub auth_refresh_path: String,
    pub auth_backend_timeout: Duration,

    // Remote REST API consumed through the API client
    pub api_base_url: Url,

    pub login_path: String,
    pub public_path_prefixes: Vec<String>,

    // Cookie lifetimes (seconds)
    pub access_token_max_age_seconds: u64,
    pub refresh_token_max_age_seconds: u64,

    pub token_file: Option<String>,
    pub token_poll_interval: Duration,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|raw| AppEnv::parse(&raw))
            .unwrap_or(AppEnv::Development);

        let auth_api_base_url = lookup("AUTH_API_BASE_URL")
            .ok_or(ConfigError::Missing("AUTH_API_BASE_URL"))
            .and_then(|raw| {
                Url::parse(raw.trim()).map_err(|_| ConfigError::Invalid("AUTH_API_BASE_URL"))
            })?;

        let auth_validate_path = endpoint_path(
            lookup("AUTH_VALIDATE_PATH"),
            "/auth/validate",
            "AUTH_VALIDATE_PATH",
        )?;
        let auth_refresh_path = endpoint_path(
            lookup("AUTH_REFRESH_PATH"),
            "/auth/refresh",
            "AUTH_REFRESH_PATH",
        )?;

        let auth_backend_timeout = Duration::from_millis(parse_or(
            &lookup,
            "AUTH_BACKEND_TIMEOUT_MS",
            5_000u64,
        )?);

        let api_base_url = match lookup("API_BASE_URL") {
            Some(raw) => Url::parse(raw.trim()).map_err(|_| ConfigError::Invalid("API_BASE_URL"))?,
            None => auth_api_base_url.clone(),
        };

        let login_path = lookup("LOGIN_PATH").unwrap_or_else(|| "/login".to_string());
        if !login_path.starts_with('/') {
            return Err(ConfigError::Invalid("LOGIN_PATH"));
        }

        let public_path_prefixes = match lookup("PUBLIC_PATH_PREFIXES") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>(),
            None => DEFAULT_PUBLIC_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let access_token_max_age_seconds =
            parse_or(&lookup, "ACCESS_TOKEN_MAX_AGE_SECONDS", 3_600u64)?; // 1 hour
        let refresh_token_max_age_seconds =
            parse_or(&lookup, "REFRESH_TOKEN_MAX_AGE_SECONDS", 604_800u64)?; // 7 days

        let token_file = lookup("TOKEN_FILE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let token_poll_interval =
            Duration::from_millis(parse_or(&lookup, "TOKEN_POLL_INTERVAL_MS", 1_000u64)?);

        let request_timeout =
            Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30u64)?);
        let request_body_limit_bytes =
            parse_or(&lookup, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024usize)?;

        Ok(Self {
            addr,
            app_env,
            auth_api_base_url,
            auth_validate_path,
            auth_refresh_path,
            auth_backend_timeout,
            api_base_url,
            login_path,
            public_path_prefixes,
            access_token_max_age_seconds,
            refresh_token_max_age_seconds,
            token_file,
            token_poll_interval,
            request_timeout,
            request_body_limit_bytes,
        })
    }

    pub fn secure_cookies(&self) -> bool {
        self.app_env.is_production()
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn endpoint_path(
    raw: Option<String>,
    default: &str,
    key: &'static str,
) -> Result<String, ConfigError> {
    let path = raw.unwrap_or_else(|| default.to_string());
    if path.starts_with('/') {
        Ok(path)
    } else {
        Err(ConfigError::Invalid(key))
    }
}
