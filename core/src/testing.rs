//! In-memory transport used by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

#[derive(Debug, Clone)]
enum Step {
    Respond(HttpResponse),
    Fail(String),
}

#[derive(Debug, Default)]
struct Script {
    steps: VecDeque<Step>,
    /// Replayed once `steps` is exhausted.
    fallback: Option<Step>,
    requests: Vec<HttpRequest>,
    calls: Vec<Instant>,
}

/// Replays canned responses in order and records every request.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.push(Step::Respond(HttpResponse::new(status, body)))
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Step::Fail(message.to_string()))
    }

    /// Every call after the scripted ones fails with `message`.
    pub fn always_fail(self, message: &str) -> Self {
        self.script.lock().unwrap().fallback = Some(Step::Fail(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    /// Clock readings (tokio time) at which each request arrived.
    pub fn call_times(&self) -> Vec<Instant> {
        self.script.lock().unwrap().calls.clone()
    }

    fn push(self, step: Step) -> Self {
        self.script.lock().unwrap().steps.push_back(step);
        self
    }
}

impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let step = {
            let mut script = self.script.lock().unwrap();
            script.requests.push(request);
            script.calls.push(Instant::now());
            script
                .steps
                .pop_front()
                .or_else(|| script.fallback.clone())
                .unwrap_or_else(|| Step::Fail("no scripted response".to_string()))
        };
        match step {
            Step::Respond(response) => Ok(response),
            Step::Fail(message) => Err(ApiError::Network(message)),
        }
    }
}
