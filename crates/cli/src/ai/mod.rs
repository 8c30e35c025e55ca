//! Model provider clients

pub mod client;

pub use client::OpenAiClient;
