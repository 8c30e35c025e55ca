//! Application configuration

use std::path::PathBuf;

use wrangler_core::{CallParams, DEFAULT_MODEL, PromptPair};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LOG_DIR: &str = "test_results";

/// Configuration loaded once at startup and shared by reference
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Prompts offered as defaults and used by the harness
    pub prompts: PromptPair,
    /// Interactive defaults
    pub defaults: CallParams,
    /// Fixed parameters for regression runs
    pub harness: CallParams,
    pub log_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let defaults = CallParams {
            model: get("PROMPT_WRANGLER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ..CallParams::default()
        };
        let harness = CallParams {
            model: get("PROMPT_WRANGLER_TEST_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ..CallParams::default()
        };

        Self {
            api_key: get("OPENAI_API_KEY"),
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            prompts: PromptPair::default(),
            defaults,
            harness,
            log_dir: get("PROMPT_WRANGLER_LOG_DIR")
                .unwrap_or_else(|| DEFAULT_LOG_DIR.into())
                .into(),
        }
    }
}
