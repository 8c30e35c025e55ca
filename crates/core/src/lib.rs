//! wrangler-core: prompt, call and comparison primitives
//!
//! This crate holds everything that does not touch the network or the
//! filesystem: the default extraction prompts, the `ChatBackend` seam and
//! `call_model`, the structural JSON diff, and the built-in fixtures.

pub mod call;
pub mod diff;
pub mod error;
pub mod fixtures;
pub mod prompt;

pub use call::{
    CallResult, ChatBackend, ChatRequest, Completion, Message, Role, TokenUsage, call_model,
};
pub use diff::{Change, JsonDiff, diff};
pub use error::WranglerError;
pub use fixtures::{ExtractedRecord, Fixture, builtin_fixtures};
pub use prompt::{
    CallParams, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE,
    DEFAULT_USER_PROMPT, PromptPair,
};
