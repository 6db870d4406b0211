//! Typed client for the LAM backend: task processing and step queries.
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::RelayConfig;

pub const TASKS_PROCESS_PATH: &str = "/tasks/process";
pub const STEPS_GET_PATH: &str = "/sdk/steps/get";

/// Failure of a single backend call.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Building the request, sending it, or reading the body failed.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// The body was not JSON of the expected shape.
    #[error("invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The JSON decoded but a required field was absent.
    #[error("missing field `{0}` in response")]
    MissingField(&'static str),
}

/// Per-call bundle of endpoint, credential and the static identity headers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub base_url: String,
    pub api_key: String,
    pub user_id: String,
    pub platform: String,
}

impl RequestContext {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            user_id: config.user_id.clone(),
            platform: config.platform.clone(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Attaches `secret-key`, `user-id` and `platform`.
    ///
    /// Invalid header values are reported by `send` as a transport error.
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("secret-key", self.api_key.as_str())
            .header("user-id", self.user_id.as_str())
            .header("platform", self.platform.as_str())
    }
}

#[derive(Serialize, Debug)]
struct StepsRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    chat_history: Option<Vec<Value>>,
}

#[derive(Deserialize, Debug)]
struct TasksProcessResponse {
    message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct StepsResponse {
    data: Option<StepsData>,
}

#[derive(Deserialize, Debug)]
struct StepsData {
    answer: Option<String>,
}

/// The two remote operations the relay can invoke.
#[async_trait]
pub trait LamBackend: Send + Sync {
    /// Asks the backend to process pending tasks and returns its status message.
    async fn process_tasks(&self) -> Result<String, RelayError>;

    /// Asks the backend for steps answering `query`.
    async fn query_steps(&self, query: &str) -> Result<String, RelayError>;
}

/// `LamBackend` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    config: RelayConfig,
    client: Client,
}

impl HttpBackend {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, RelayError> {
        let response = request.send().await?;
        debug!(path, status = %response.status(), "Backend responded");

        // Status is not checked: any reply is judged by its body alone.
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl LamBackend for HttpBackend {
    async fn process_tasks(&self) -> Result<String, RelayError> {
        let context = RequestContext::from_config(&self.config);
        let request = context.apply(self.client.get(context.url(TASKS_PROCESS_PATH)));

        let response: TasksProcessResponse =
            self.send_json(request, TASKS_PROCESS_PATH).await?;
        response.message.ok_or(RelayError::MissingField("message"))
    }

    async fn query_steps(&self, query: &str) -> Result<String, RelayError> {
        let context = RequestContext::from_config(&self.config);
        let body = StepsRequest {
            query,
            chat_history: self.config.send_chat_history.then(Vec::new),
        };
        let request = context.apply(self.client.post(context.url(STEPS_GET_PATH)).json(&body));

        let response: StepsResponse = self.send_json(request, STEPS_GET_PATH).await?;
        response
            .data
            .ok_or(RelayError::MissingField("data"))?
            .answer
            .ok_or(RelayError::MissingField("data.answer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server: &MockServer) -> HttpBackend {
        HttpBackend::new(RelayConfig::new(server.uri(), "test-key"))
    }

    #[test]
    fn test_request_context_url() {
        let mut config = RelayConfig::new("http://localhost:8000/", "k");
        let context = RequestContext::from_config(&config);
        assert_eq!(context.url(TASKS_PROCESS_PATH), "http://localhost:8000/tasks/process");

        config.base_url = "http://localhost:8000".to_string();
        let context = RequestContext::from_config(&config);
        assert_eq!(context.url(STEPS_GET_PATH), "http://localhost:8000/sdk/steps/get");
    }

    #[tokio::test]
    async fn test_process_tasks_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/process"))
            .and(header("secret-key", "test-key"))
            .and(header("user-id", "lam-preview-user"))
            .and(header("platform", "terminal"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Task started"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let message = backend_for(&server).process_tasks().await.unwrap();
        assert_eq!(message, "Task started");
    }

    #[tokio::test]
    async fn test_process_tasks_missing_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/process"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = backend_for(&server).process_tasks().await.unwrap_err();
        assert!(matches!(err, RelayError::MissingField("message")));
        assert_eq!(err.to_string(), "missing field `message` in response");
    }

    #[tokio::test]
    async fn test_query_steps_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sdk/steps/get"))
            .and(header("secret-key", "test-key"))
            .and(header("user-id", "lam-preview-user"))
            .and(header("platform", "terminal"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "query": "play jazz" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "answer": "Playing jazz", "steps": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = backend_for(&server).query_steps("play jazz").await.unwrap();
        assert_eq!(answer, "Playing jazz");
    }

    #[tokio::test]
    async fn test_query_steps_sends_empty_chat_history_when_enabled() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sdk/steps/get"))
            .and(body_json(json!({ "query": "hello", "chat_history": [] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "answer": "hi" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = RelayConfig {
            send_chat_history: true,
            ..RelayConfig::new(server.uri(), "test-key")
        };
        let answer = HttpBackend::new(config).query_steps("hello").await.unwrap();
        assert_eq!(answer, "hi");
    }

    #[tokio::test]
    async fn test_query_steps_missing_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sdk/steps/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .mount(&server)
            .await;

        let err = backend_for(&server).query_steps("q").await.unwrap_err();
        assert!(matches!(err, RelayError::MissingField("data.answer")));

        server.reset().await;
        Mock::given(method("POST"))
            .and(path("/sdk/steps/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "x" })))
            .mount(&server)
            .await;

        let err = backend_for(&server).query_steps("q").await.unwrap_err();
        assert!(matches!(err, RelayError::MissingField("data")));
    }

    #[tokio::test]
    async fn test_non_json_error_response_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/process"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let err = backend_for(&server).process_tasks().await.unwrap_err();
        assert!(matches!(err, RelayError::Decode(_)));
        assert!(err.to_string().starts_with("invalid JSON response"));
    }

    #[tokio::test]
    async fn test_error_status_with_expected_body_still_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/process"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "message": "No tasks" })),
            )
            .mount(&server)
            .await;

        let message = backend_for(&server).process_tasks().await.unwrap();
        assert_eq!(message, "No tasks");
    }

    #[tokio::test]
    async fn test_missing_base_url_is_transport_error() {
        let backend = HttpBackend::new(RelayConfig::default());
        let err = backend.process_tasks().await.unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));
    }
}
