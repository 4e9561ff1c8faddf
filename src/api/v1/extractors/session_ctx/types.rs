/*
 * Responsibility
 * - The "session approved by the gate" type handlers see
 * - The gate middleware stores it in request extensions; handlers only receive this type
 */

/// Session of a request that passed the token gate.
///
/// - `access_token`: the token the remote API should receive for this request
/// - `refreshed`: `true` when the gate minted it during this request
#[derive(Clone)]
pub struct SessionCtx {
    pub access_token: String,
    pub refreshed: bool,
}

impl SessionCtx {
    pub fn new(access_token: impl Into<String>, refreshed: bool) -> Self {
        Self {
            access_token: access_token.into(),
            refreshed,
        }
    }
}

impl std::fmt::Debug for SessionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCtx")
            .field("access_token", &"<redacted>")
            .field("refreshed", &self.refreshed)
            .finish()
    }
}
