// crates/caresync-gateway/tests/common/mod.rs
// ============================================================================
// Module: Gateway Test Helpers
// Description: Local HTTP server scaffolding for gateway client tests.
// Purpose: Record requests and serve scripted responses without a real store.
// Dependencies: tiny_http
// ============================================================================

//! Shared helpers spawning a local recording HTTP server.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    dead_code,
    reason = "Test-only helpers; not every test file uses every helper."
)]

use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use tiny_http::Response;
use tiny_http::Server;

/// One request observed by the local server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method as sent.
    pub method: String,
    /// Path and query string as sent.
    pub url: String,
    /// Request body text.
    pub body: String,
}

/// Spawns a local server answering exactly `expected` requests.
///
/// The responder maps each recorded request to a status and JSON body.
/// Returns the base URL, the shared request log, and the server thread
/// handle; join it after driving the client.
pub fn spawn_json_server(
    expected: usize,
    responder: impl Fn(&RecordedRequest) -> (u16, String) + Send + 'static,
) -> (String, Arc<Mutex<Vec<RecordedRequest>>>, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let thread_log = Arc::clone(&log);
    let handle = thread::spawn(move || {
        for _ in 0 .. expected {
            let mut request = server.recv().unwrap();
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body).unwrap();
            let recorded = RecordedRequest {
                method: request.method().to_string(),
                url: request.url().to_string(),
                body,
            };
            let (status, response_body) = responder(&recorded);
            thread_log.lock().unwrap().push(recorded);
            let response = Response::from_string(response_body).with_status_code(status);
            request.respond(response).unwrap();
        }
    });
    (format!("http://{addr}"), log, handle)
}

/// Extracts the quoted keys from an `_all_docs` request URL.
pub fn keys_from_url(url: &str) -> Vec<String> {
    let start = url.find("keys=[").map(|index| index + 6).unwrap_or(url.len());
    let end = url.rfind(']').unwrap_or(url.len());
    if start >= end {
        return Vec::new();
    }
    url[start .. end]
        .split(',')
        .map(|quoted| quoted.trim_matches('"').to_string())
        .collect()
}
