use log::{info, warn};
use serde::Deserialize;
use serde_json::json;

use linknet::{BuildRequest, Session};

use crate::handlers::ApiResponse;
use crate::state::{lock, SharedSession, SharedState};

#[derive(Debug, Deserialize)]
struct RunBody {
    #[serde(rename = "serviceID")]
    service_id: String,
    inputs: Vec<f64>,
    labels: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct PredictBody {
    #[serde(rename = "serviceID")]
    service_id: String,
    inputs: Vec<f64>,
}

fn parse<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, ApiResponse> {
    serde_json::from_str(body).map_err(|e| ApiResponse::error(400, format!("malformed request: {e}")))
}

fn find(state: &SharedState, id: &str) -> Result<SharedSession, ApiResponse> {
    lock(state)
        .get(id)
        .ok_or_else(|| ApiResponse::error(404, format!("unknown serviceID {id:?}")))
}

// ---------------------------------------------------------------------------
// POST /classifier/classic/start
// ---------------------------------------------------------------------------

pub fn start(body: &str, state: &SharedState) -> ApiResponse {
    let request: BuildRequest = match parse(body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    match Session::build(&request) {
        Ok(session) => {
            let mut registry = lock(state);
            let id = registry.insert(session);
            let live = registry.len();
            drop(registry);
            info!(
                "started session {id} shape={:?} live_sessions={live}",
                request.architecture_params.network_shape
            );
            ApiResponse::ok(json!({ "serviceID": id }))
        }
        Err(e) => {
            warn!("rejected build request: {e}");
            ApiResponse::error(400, e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// POST /classifier/classic/run
// ---------------------------------------------------------------------------

pub fn run(body: &str, state: &SharedState) -> ApiResponse {
    let body: RunBody = match parse(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let session = match find(state, &body.service_id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let result = lock(&session).run(&body.inputs, &body.labels);
    match result {
        Ok(report) => ApiResponse::ok(json!({ "epochs": report.epochs, "loss": report.loss })),
        Err(e) => ApiResponse::error(400, e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// POST /classifier/classic/predict
// ---------------------------------------------------------------------------

pub fn predict(body: &str, state: &SharedState) -> ApiResponse {
    let body: PredictBody = match parse(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let session = match find(state, &body.service_id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let result = lock(&session).predict(&body.inputs);
    match result {
        Ok(outputs) => ApiResponse::ok(json!({ "outputs": outputs })),
        Err(e) => ApiResponse::error(400, e.to_string()),
    }
}
