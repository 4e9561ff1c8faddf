use serde::{Deserialize, Serialize};

/// Body of `POST /v1/api/auth/validate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

/// Plain acknowledgment used by refresh and logout.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}
