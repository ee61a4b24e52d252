pub mod classic;

use serde_json::{json, Value};

/// Status code plus JSON body; turned into a tiny_http response by the router.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        ApiResponse { status: 200, body }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        ApiResponse { status, body: json!({ "error": message.into() }) }
    }
}

/// `GET /`
pub fn health() -> ApiResponse {
    ApiResponse::ok(json!({ "status": "ok" }))
}
