use crate::error::{GemPromptError, Result};
use reqwest::Response;
use serde::Deserialize;
use tracing::error;

/// Google's error envelope: `{"error": {"code": 403, "message": "...", "status": "PERMISSION_DENIED"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Pull the human-readable message out of an error body, falling back to the raw text.
pub(crate) fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) if !error.message.is_empty() => match error.status {
            Some(status) => format!("{} ({})", error.message, status),
            None => error.message,
        },
        _ => body.trim().to_string(),
    }
}

/// Convert a reqwest error to a GemPromptError.
///
/// The request URL is dropped from the error so nothing from the endpoint
/// (a custom base URL may embed credentials) ends up in messages or logs.
pub fn handle_http_error(e: reqwest::Error, provider_name: &str) -> GemPromptError {
    let e = e.without_url();
    error!(
        error = %e,
        is_connect = e.is_connect(),
        "HTTP request to {} failed", provider_name
    );
    if e.is_timeout() {
        GemPromptError::Timeout
    } else {
        GemPromptError::HttpError(e)
    }
}

/// Pass successful responses through; turn anything else into an `ApiError`
/// carrying the service's own error message.
pub async fn check_response_status(response: Response, provider_name: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    let detail = describe_error_body(&body);
    error!(
        status = %status,
        error = %detail,
        "{} API returned error response", provider_name
    );
    Err(GemPromptError::ApiError(format!(
        "{} API error: {}",
        provider_name, detail
    )))
}

/// Macro to generate standard builder methods for HTTP clients.
///
/// This macro generates `temperature()`, `max_tokens()`, and `timeout()` methods
/// for any client whose config carries those fields.
#[macro_export]
macro_rules! impl_client_builder_methods {
    (
        client_type: $client:ty,
        provider_name: $provider:expr
    ) => {
        impl $client {
            /// Set the sampling temperature (lower = more deterministic).
            ///
            /// Unset by default, which leaves the choice to the service.
            #[tracing::instrument(skip(self))]
            pub fn temperature(mut self, temp: f32) -> Self {
                tracing::debug!(
                    previous_temp = ?self.config.temperature,
                    new_temp = temp,
                    "Setting {} temperature", $provider
                );
                self.config.temperature = Some(temp);
                self
            }

            /// Set the maximum tokens to generate
            #[tracing::instrument(skip(self))]
            pub fn max_tokens(mut self, max: u32) -> Self {
                tracing::debug!(
                    previous_max = ?self.config.max_tokens,
                    new_max = max,
                    "Setting max_tokens"
                );
                // At least 1, the API rejects 0
                self.config.max_tokens = Some(max.max(1));
                self
            }

            /// Set the timeout for HTTP requests.
            ///
            /// The timeout covers the whole request, and applies to each HTTP
            /// request made by the client (listing may make several).
            ///
            /// # Arguments
            ///
            /// * `timeout` - Timeout duration (e.g., `Duration::from_secs(30)` for 30 seconds)
            #[tracing::instrument(skip(self))]
            pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
                tracing::debug!(
                    previous_timeout = ?self.config.timeout,
                    new_timeout = ?timeout,
                    "Setting timeout"
                );
                self.config.timeout = Some(timeout);

                self.client = reqwest::Client::builder()
                    .timeout(timeout)
                    .build()
                    .unwrap_or_else(|e| {
                        tracing::warn!(
                            error = %e,
                            "Failed to build reqwest client with timeout, using default"
                        );
                        reqwest::Client::new()
                    });

                self
            }
        }
    };
}
