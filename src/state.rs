/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - gate: TokenGate, cookies: SessionCookies, token: TokenHolder, api: ApiClient
 * - Cloned per request (everything inside is Arc / cheap to clone)
 */
use std::sync::Arc;

use crate::services::{
    api_client::ApiClient,
    auth::{SessionCookies, TokenGate},
    token::TokenHolder,
};

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: Arc<TokenGate>,
    pub cookies: SessionCookies,
    pub token: TokenHolder,
    pub api: ApiClient,
}

impl AppState {
    pub fn new(
        gate: Arc<TokenGate>,
        cookies: SessionCookies,
        token: TokenHolder,
        api: ApiClient,
    ) -> Self {
        Self {
            gate,
            cookies,
            token,
            api,
        }
    }
}
