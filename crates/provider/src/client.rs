//! Client for communicating with the control-plane API
//!
//! The reconciliation core only needs one capability from the transport:
//! send a request and hand back the status code and decoded body. That
//! capability is the [`RequestExecutor`] trait; [`HttpExecutor`] is the
//! production implementation and tests substitute a scripted one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use amqpctl_common::{ClientConfig, Error, PollSettings, Result};

use crate::poller::{PollConfig, Poller};

/// HTTP method of a control-plane request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Request body encodings the control plane accepts
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }
}

/// Status code plus decoded body (success or failure shape alike).
/// An empty body decodes to `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// Executes a single request against the control plane
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Errors only when the request could not be made; every status code,
    /// including failures, comes back as a response.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Request executor backed by `reqwest`
pub struct HttpExecutor {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpExecutor {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("amqpctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .http
            .request(method, self.url(&request.path))
            .basic_auth("", Some(&self.api_key));

        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(fields)) => builder.form(fields),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(ApiResponse::new(status, decode_body(&bytes)))
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Failure bodies are not always JSON; those are kept as a plain string.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Handle passed to every resource operation: the executor, the poll
/// bounds, and the cancellation token that aborts reconciliation.
#[derive(Clone)]
pub struct ApiClient {
    executor: Arc<dyn RequestExecutor>,
    poll: PollSettings,
    cancel: CancellationToken,
}

impl ApiClient {
    pub fn new(executor: Arc<dyn RequestExecutor>, poll: PollSettings) -> Self {
        Self {
            executor,
            poll,
            cancel: CancellationToken::new(),
        }
    }

    /// Build a client talking HTTP to the configured control plane
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let executor = HttpExecutor::new(config)?;
        Ok(Self::new(Arc::new(executor), config.poll.clone()))
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn poll_settings(&self) -> &PollSettings {
        &self.poll
    }

    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        debug!("method={} path={}", request.method, request.path);
        let response = self.executor.execute(request).await?;
        debug!("status={} body={}", response.status, response.body);
        Ok(response)
    }

    pub(crate) fn poller(&self, initial_delay: Duration) -> Poller {
        let config = PollConfig {
            initial_delay,
            ..PollConfig::from(&self.poll)
        };
        Poller::new(config, self.cancel.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://customer.cloudamqp.com/", "/api/vpcs"),
            "https://customer.cloudamqp.com/api/vpcs"
        );
        assert_eq!(
            join_url("http://localhost:8080", "api/vpcs/7/vpc-peering/info"),
            "http://localhost:8080/api/vpcs/7/vpc-peering/info"
        );
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b""), Value::Null);
        assert_eq!(decode_body(b"  \n"), Value::Null);
        assert_eq!(decode_body(br#"{"id": 7}"#), serde_json::json!({"id": 7}));
        assert_eq!(
            decode_body(b"Bad Gateway"),
            Value::String("Bad Gateway".to_string())
        );
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = ClientConfig::default();
        assert!(matches!(
            ApiClient::from_config(&config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_poller_uses_requested_initial_delay() {
        let mut config = ClientConfig::default();
        config.api_key = "secret".to_string();
        let client = ApiClient::from_config(&config).unwrap();
        let poller = client.poller(Duration::ZERO);
        assert_eq!(poller.config().initial_delay, Duration::ZERO);
        assert_eq!(poller.config().interval, Duration::from_secs(10));
    }
}
