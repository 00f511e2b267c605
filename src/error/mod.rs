use thiserror::Error;

/// Error types for the gemprompt library.
///
/// Parsing a model directive never produces an error on its own; the lenient
/// parser degrades to a zero budget instead. Errors come from the strict
/// parser, from client construction, and from talking to the Gemini API.
///
/// # Examples
///
/// ```
/// use gemprompt::{GemPromptError, Result};
///
/// fn describe(result: Result<String>) -> String {
///     match result {
///         Ok(text) => text,
///         Err(GemPromptError::ProviderFailure(msg)) => format!("generation failed: {}", msg),
///         Err(e) => format!("unexpected error: {}", e),
///     }
/// }
///
/// let msg = describe(Err(GemPromptError::ProviderFailure("quota exceeded".into())));
/// assert_eq!(msg, "generation failed: quota exceeded");
/// ```
#[derive(Error, Debug)]
pub enum GemPromptError {
    /// A reasoning-budget directive could not be honored (strict parsing only)
    #[error("Invalid directive: {0}")]
    InvalidDirective(String),

    /// Generating a response failed, whatever the underlying cause
    #[error("Provider failure: {0}")]
    ProviderFailure(String),

    /// Error interacting with the Gemini API
    #[error("API error: {0}")]
    ApiError(String),

    /// Operation timed out
    #[error("Timeout error")]
    Timeout,

    /// HTTP client error (from reqwest)
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error (from serde_json)
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// HttpError and JsonError never compare equal: their payloads don't implement PartialEq.
impl PartialEq for GemPromptError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidDirective(a), Self::InvalidDirective(b)) => a == b,
            (Self::ProviderFailure(a), Self::ProviderFailure(b)) => a == b,
            (Self::ApiError(a), Self::ApiError(b)) => a == b,
            (Self::Timeout, Self::Timeout) => true,
            _ => false,
        }
    }
}

/// A specialized Result type for gemprompt operations.
pub type Result<T> = std::result::Result<T, GemPromptError>;
