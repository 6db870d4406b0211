//! Test utilities for the lam binary.

use lam_core::client::{HttpBackend, LamBackend};
use lam_core::config::RelayConfig;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts a mock LAM backend.
///
/// `GET /tasks/process` answers `{"message": "Task started"}` and
/// `POST /sdk/steps/get` answers `{"data": {"answer": "Playing jazz"}}`.
pub async fn start_mock_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/process"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Task started"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sdk/steps/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "answer": "Playing jazz" }
        })))
        .mount(&server)
        .await;
    server
}

/// HTTP backend pointed at `server`.
pub fn mock_backend(server: &MockServer) -> Arc<dyn LamBackend> {
    Arc::new(HttpBackend::new(RelayConfig::new(server.uri(), "test-key")))
}
