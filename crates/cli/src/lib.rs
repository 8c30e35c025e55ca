//! prompt-wrangler library crate
//!
//! Exposes configuration, the OpenAI client, the interactive session and the
//! regression harness. The binary entrypoints are `main.rs` (interactive)
//! and `bin/wrangler_eval.rs` (harness).

pub mod ai;
pub mod config;
pub mod error;
pub mod harness;
pub mod interactive;
pub mod report;

#[cfg(test)]
mod testing;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr tracing subscriber, filtered by `RUST_LOG` (default `warn`).
///
/// Stdout is left to the prompts and reports.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
