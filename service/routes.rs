use std::io::{Cursor, Read};

use log::{debug, warn};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::handlers::{self, ApiResponse};
use crate::state::SharedState;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Permissive CORS headers so browser front ends on other origins can call in.
fn cors_headers() -> Vec<Header> {
    [
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
        ("Access-Control-Allow-Headers", "*"),
    ]
    .iter()
    .filter_map(|(name, value)| Header::from_bytes(name.as_bytes(), value.as_bytes()).ok())
    .collect()
}

pub fn json_response(api: ApiResponse) -> Response<Cursor<Vec<u8>>> {
    let bytes = api.body.to_string().into_bytes();
    let len = bytes.len();
    let mut headers = cors_headers();
    headers.extend(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]));
    Response::new(StatusCode(api.status), headers, Cursor::new(bytes), Some(len), None)
}

/// Empty 204 answer to a CORS preflight.
pub fn preflight_response() -> Response<Cursor<Vec<u8>>> {
    Response::new(StatusCode(204), cors_headers(), Cursor::new(Vec::new()), Some(0), None)
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Reads the body, routes on method and path, and responds with JSON.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url = request.url().to_owned();
    let path = url.split('?').next().unwrap_or("").to_owned();

    if method == Method::Options {
        debug!("{method} {path} -> 204");
        let _ = request.respond(preflight_response());
        return;
    }

    let mut body = String::new();
    if let Err(e) = request.as_reader().read_to_string(&mut body) {
        warn!("failed to read body of {method} {path}: {e}");
        let _ = request.respond(json_response(ApiResponse::error(400, "unreadable request body")));
        return;
    }

    let api = route(&method, &path, &body, &state);
    debug!("{method} {path} -> {}", api.status);
    let _ = request.respond(json_response(api));
}

pub fn route(method: &Method, path: &str, body: &str, state: &SharedState) -> ApiResponse {
    match (method, path) {
        (Method::Get, "/") => handlers::health(),

        (Method::Post, "/classifier/classic/start") => handlers::classic::start(body, state),
        (Method::Post, "/classifier/classic/run") => handlers::classic::run(body, state),
        (Method::Post, "/classifier/classic/predict") => handlers::classic::predict(body, state),

        _ => ApiResponse::error(404, format!("no route for {method} {path}")),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::state::ServiceState;

    #[test]
    fn unknown_paths_are_404() {
        let state = Arc::new(Mutex::new(ServiceState::new()));
        assert_eq!(route(&Method::Get, "/nope", "", &state).status, 404);
        assert_eq!(route(&Method::Get, "/classifier/classic/start", "", &state).status, 404);
        assert_eq!(route(&Method::Get, "/", "", &state).status, 200);
    }

    fn has_header(headers: &[Header], name: &'static str, value: &str) -> bool {
        headers.iter().any(|h| h.field.equiv(name) && h.value.as_str() == value)
    }

    #[test]
    fn responses_carry_cors_headers() {
        let resp = json_response(ApiResponse::error(404, "nope"));
        assert_eq!(resp.status_code().0, 404);
        assert!(has_header(resp.headers(), "Access-Control-Allow-Origin", "*"));
        assert!(has_header(resp.headers(), "Content-Type", "application/json"));

        let preflight = preflight_response();
        assert_eq!(preflight.status_code().0, 204);
        assert!(has_header(preflight.headers(), "Access-Control-Allow-Methods", "GET, POST, OPTIONS"));
        assert!(has_header(preflight.headers(), "Access-Control-Allow-Headers", "*"));
    }
}
