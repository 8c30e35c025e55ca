//! OpenAI client for the Chat Completions API

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use wrangler_core::{ChatBackend, ChatRequest, Completion, Message, TokenUsage, WranglerError};

use crate::config::Config;

/// Client for the OpenAI Chat Completions API
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

/// Request body for the Chat Completions API
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Response from the Chat Completions API
#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Error envelope returned on non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenAiClient {
    /// Create a client against `base_url` (e.g. `https://api.openai.com/v1`)
    pub fn new(api_key: String, base_url: &str) -> Result<Self, WranglerError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| WranglerError::ClientInit(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    /// Construct the client from configuration, failing if no API key is set
    pub fn from_config(config: &Config) -> Result<Self, WranglerError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(WranglerError::MissingCredential)?;
        Self::new(api_key, &config.base_url)
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Completion, WranglerError> {
        let body = ApiRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request
                .json_object
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| WranglerError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiError>(&text) {
                Ok(api_err) => api_err.error.message,
                Err(_) => text,
            };
            tracing::warn!(status = status.as_u16(), "Chat completion rejected");
            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                WranglerError::RateLimited {
                    status: status.as_u16(),
                    message,
                }
            } else {
                WranglerError::Api {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let parsed = response
            .json::<ApiResponse>()
            .await
            .map_err(|e| WranglerError::Unexpected(format!("Failed to parse response: {e}")))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| WranglerError::Unexpected("No choices in response".to_string()))?;

        let usage = parsed
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrangler_core::{CallParams, PromptPair};

    #[test]
    fn missing_key_is_a_credential_error() {
        let config = Config::from_lookup(|_| None);
        let err = OpenAiClient::from_config(&config).err().expect("error");
        assert_eq!(err, WranglerError::MissingCredential);
        assert!(err.is_fatal());
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = OpenAiClient::new("sk".to_string(), "http://localhost:1234/v1/").unwrap();
        assert_eq!(client.endpoint, "http://localhost:1234/v1/chat/completions");
    }

    #[test]
    fn request_body_requests_json_object() {
        let request = ChatRequest::build(&PromptPair::new("s", "u"), "i", &CallParams::default());
        let body = ApiRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: Some(ResponseFormat { kind: "json_object" }),
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 250);
    }
}
