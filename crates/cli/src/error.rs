//! Application error handling

use std::backtrace::Backtrace;
use std::io;

use thiserror::Error;
use wrangler_core::WranglerError;

/// Errors surfaced by the interactive session and the harness
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard input reached end-of-file at a prompt
    #[error("input stream closed")]
    InputClosed,

    #[error(transparent)]
    Client(#[from] WranglerError),

    #[error("I/O error: {source}")]
    Io { source: io::Error, trace: String },

    #[error("JSON error: {source}")]
    Json {
        source: serde_json::Error,
        trace: String,
    },
}

impl AppError {
    /// Backtrace captured where the error entered the application
    pub fn trace(&self) -> Option<&str> {
        match self {
            AppError::Io { trace, .. } | AppError::Json { trace, .. } => {
                Some(trace.as_str())
            }
            AppError::InputClosed | AppError::Client(_) => None,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(source: io::Error) -> Self {
        AppError::Io {
            source,
            trace: Backtrace::force_capture().to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(source: serde_json::Error) -> Self {
        AppError::Json {
            source,
            trace: Backtrace::force_capture().to_string(),
        }
    }
}
