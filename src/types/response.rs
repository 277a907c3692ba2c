use serde::{Deserialize, Serialize};

pub const MIME_JSON: &str = "application/json";

/// The `{"message": ...}` envelope the backend attaches to every non-list
/// response, including errors. Token errors use `msg` instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    #[serde(default, alias = "msg", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of a token rejection raised by the backend's JWT layer, for example
/// `{"msg": "Not enough segments"}` on a malformed token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub msg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: String,
}
