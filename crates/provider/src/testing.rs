//! Scripted request executor and log capture for unit tests

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use amqpctl_common::{Error, PollSettings, Result};

use crate::client::{ApiClient, ApiRequest, ApiResponse, Method, RequestExecutor};

/// Replays queued responses per `(method, path)`. The last queued response
/// for a route repeats once the others are used up.
#[derive(Default)]
pub struct ScriptedExecutor {
    routes: Mutex<HashMap<(Method, String), VecDeque<ApiResponse>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl ScriptedExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(ApiResponse::new(status, body));
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }

    pub fn count_method(&self, method: Method) -> usize {
        self.calls.lock().iter().filter(|call| call.method == method).count()
    }
}

#[async_trait]
impl RequestExecutor for ScriptedExecutor {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let key = (request.method, request.path.clone());
        self.calls.lock().push(request);

        let mut routes = self.routes.lock();
        let queue = routes
            .get_mut(&key)
            .ok_or_else(|| Error::Transport(format!("no scripted response for {} {}", key.0, key.1)))?;

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| Error::Transport(format!("empty script for {} {}", key.0, key.1)))
    }
}

/// Client over `executor` with the default 10s cadence and a generous bound
pub fn client(executor: &Arc<ScriptedExecutor>) -> ApiClient {
    let poll = PollSettings {
        max_attempts: Some(50),
        timeout_secs: None,
        ..PollSettings::default()
    };
    ApiClient::new(executor.clone(), poll)
}

/// Collects formatted log lines for the current thread while the guard lives
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Install a subscriber writing WARN and above into the returned buffer
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let logs = Self::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_target(false)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buffer.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
