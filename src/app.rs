/*
 * Responsibility
 * - tracing / panic hook setup
 * - Config → dependencies → Router assembly
 * - Middleware ordering (HTTP layers outermost, token gate inside)
 * - Token sync task lifecycle, axum::serve() with graceful shutdown
 */
use std::{panic, process, sync::Arc};

use axum::{Json, Router, http::StatusCode, response::IntoResponse};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::error::{AppError, ErrorBody, ErrorResponse};
use crate::middleware::{self, http::HttpLimits};
use crate::services::api_client::ApiClient;
use crate::services::auth::{build_token_gate, session_cookies};
use crate::services::token::{FileTokenStore, TokenHolder, TokenSync};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,portal_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics through tracing; stderr may be hidden depending on how we are launched.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so it gets noticed.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting portal gate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sync_task = config.token_file.as_ref().map(|path| {
        let store = Arc::new(FileTokenStore::new(path));
        TokenSync::new(store, state.token.clone(), config.token_poll_interval).spawn(shutdown_rx)
    });

    let app = build_router(
        state,
        HttpLimits {
            timeout: config.request_timeout,
            body_limit_bytes: config.request_body_limit_bytes,
        },
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Some(task) = sync_task {
        if let Err(err) = task.await {
            tracing::warn!(error = %err, "token sync task ended abnormally");
        }
    }

    tracing::info!("portal gate stopped");
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState, AppError> {
    // Process-level services, injected into the shared state.
    let gate = build_token_gate(config)?;
    let token = TokenHolder::new();
    let api = ApiClient::new(
        config.api_base_url.clone(),
        config.request_timeout,
        token.clone(),
    )
    .map_err(|err| {
        tracing::error!(error = %err, "failed to build api client");
        AppError::Internal
    })?;

    Ok(AppState::new(gate, session_cookies(config), token, api))
}

/// Router with the token gate and HTTP layers applied.
pub fn build_router(state: AppState, limits: HttpLimits) -> Router {
    let router = api::v1::routes().fallback(not_found);
    let router = middleware::auth::gate::apply(router, state.clone()).with_state(state);
    middleware::http::apply(router, limits)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: ErrorBody {
                code: "NOT_FOUND",
                message: "not found".into(),
            },
        }),
    )
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
