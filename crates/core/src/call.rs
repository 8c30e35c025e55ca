//! Single-attempt call primitive over a chat-completion backend

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::WranglerError;
use crate::prompt::{CallParams, PromptPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Provider-neutral chat request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider to constrain output to a JSON object
    pub json_object: bool,
}

impl ChatRequest {
    pub fn build(prompts: &PromptPair, input_text: &str, params: &CallParams) -> Self {
        Self {
            model: params.model.clone(),
            messages: vec![
                Message {
                    role: Role::System,
                    content: prompts.system.clone(),
                },
                Message {
                    role: Role::User,
                    content: prompts.render_user_content(input_text),
                },
            ],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            json_object: true,
        }
    }
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Successful response: raw model text plus usage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub usage: TokenUsage,
}

/// Anything able to answer a chat request.
///
/// Implementations make exactly one attempt per call and report failures
/// through [`WranglerError`]; retries are not part of the contract.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<Completion, WranglerError>;
}

/// Outcome of one model call, always carrying the measured wall-clock time
#[derive(Debug, Clone)]
pub struct CallResult {
    pub elapsed: Duration,
    pub outcome: Result<Completion, WranglerError>,
}

impl CallResult {
    /// Raw model output, `None` when the call failed
    pub fn output_text(&self) -> Option<&str> {
        self.outcome.as_ref().ok().map(|c| c.content.as_str())
    }

    pub fn error(&self) -> Option<&WranglerError> {
        self.outcome.as_ref().err()
    }

    /// Token usage, zeroed when the call failed
    pub fn usage(&self) -> TokenUsage {
        self.outcome
            .as_ref()
            .map(|c| c.usage)
            .unwrap_or_default()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Send the prompt pair plus input text to the backend and time the request.
///
/// Never fails: errors are folded into the returned [`CallResult`].
pub async fn call_model<B>(
    backend: &B,
    prompts: &PromptPair,
    input_text: &str,
    params: &CallParams,
) -> CallResult
where
    B: ChatBackend + ?Sized,
{
    let request = ChatRequest::build(prompts, input_text, params);

    tracing::debug!(
        model = %params.model,
        temperature = params.temperature,
        max_tokens = params.max_tokens,
        "Sending chat completion"
    );

    let start = Instant::now();
    let outcome = backend.complete(&request).await;
    let elapsed = start.elapsed();

    match &outcome {
        Ok(completion) => tracing::debug!(
            elapsed_ms = elapsed.as_millis() as u64,
            total_tokens = completion.usage.total_tokens,
            "Chat completion received"
        ),
        Err(e) => tracing::error!(error = %e, "Chat completion failed"),
    }

    CallResult { elapsed, outcome }
}
