//! Scripted in-process gateway for tests.
//!
//! Replies come from a queue; once it runs dry every call answers
//! `"reply {n}"` with `n` counting from 1. Every request is captured so tests
//! can assert on exactly what would have been sent upstream.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use coursebot_types::llm::{CompletionRequest, LlmError};

use super::gateway::CompletionGateway;

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<String, LlmError>>,
    requests: Vec<CompletionRequest>,
    always_fail: bool,
}

/// Cloneable fake gateway; clones share the same script and capture log.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl ScriptedGateway {
    /// Queue successful replies in order.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let gateway = Self::default();
        {
            let mut script = gateway.lock();
            script.replies = replies.into_iter().map(|r| Ok(r.into())).collect();
        }
        gateway
    }

    /// A gateway whose every call fails with a provider error.
    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.lock().always_fail = true;
        gateway
    }

    /// Queue a failure to be returned by the next unanswered call.
    pub fn push_error(&self, error: LlmError) {
        self.lock().replies.push_back(Err(error));
    }

    /// Sleep this long inside every call before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.lock().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        // A panicking test thread must not wedge the others.
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CompletionGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let outcome = {
            let mut script = self.lock();
            script.requests.push(request.clone());
            let call = script.requests.len();
            if script.always_fail {
                Err(LlmError::Provider {
                    message: "scripted upstream failure".to_string(),
                })
            } else {
                script
                    .replies
                    .pop_front()
                    .unwrap_or_else(|| Ok(format!("reply {call}")))
            }
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}
