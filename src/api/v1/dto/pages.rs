use serde::Serialize;

/// Shell returned for gated admin pages; the front-end renders the rest.
#[derive(Debug, Clone, Serialize)]
pub struct PageShell {
    pub page: String,
    pub authenticated: bool,
    pub refreshed: bool,
}
