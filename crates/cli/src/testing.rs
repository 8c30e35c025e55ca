//! Scripted backend for unit tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use wrangler_core::{ChatBackend, ChatRequest, Completion, TokenUsage, WranglerError};

/// Replays queued outcomes in order and records every request
#[derive(Default)]
pub struct ScriptedBackend {
    outcomes: Mutex<VecDeque<Result<Completion, WranglerError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn new<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Result<Completion, WranglerError>>,
    {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Successful replies with fixed usage (10 prompt, 5 completion)
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(|content| {
            Ok(Completion {
                content: content.into(),
                usage: TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                },
            })
        }))
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<Completion, WranglerError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(WranglerError::Unexpected("no scripted reply left".into())))
    }
}
