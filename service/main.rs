/// linknet service
///
/// Hosts training sessions behind a small JSON API on a synchronous
/// tiny_http server. Every request is handled on its own thread.
///
/// Run with:
///   RUST_LOG=info cargo run --bin service --release
///
/// `HOST` and `PORT` pick the bind address (default 127.0.0.1:8000).
///
/// Endpoints:
///   GET  /                           health check
///   POST /classifier/classic/start   build a session, returns its serviceID
///   POST /classifier/classic/run     train on one sample
///   POST /classifier/classic/predict forward pass only

mod state;
mod routes;
mod handlers;

use std::sync::{Arc, Mutex};

use log::{error, info};
use tiny_http::Server;

use state::ServiceState;

fn main() {
    env_logger::init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_owned());
    let addr = format!("{host}:{port}");

    let server = match Server::http(&addr) {
        Ok(server) => server,
        Err(e) => {
            error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    info!("linknet service listening on http://{addr}");

    let shared_state = Arc::new(Mutex::new(ServiceState::new()));

    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
}
