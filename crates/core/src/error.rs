use thiserror::Error;

/// Failures raised while talking to the completion API
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WranglerError {
    #[error("OPENAI_API_KEY not found in environment variables or .env file")]
    MissingCredential,

    #[error("Error initializing OpenAI client: {0}")]
    ClientInit(String),

    #[error("API Error: rate limited ({status}): {message}")]
    RateLimited { status: u16, message: String },

    #[error("API Error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Output was not valid JSON: {0}")]
    MalformedResponse(String),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl WranglerError {
    /// Startup failures that must abort the program
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::ClientInit(_))
    }
}
