use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument, trace};

use crate::backend::{GenerationClient, ModelListing, check_response_status, handle_http_error};
use crate::error::{GemPromptError, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Header carrying the key; kept out of the URL so it never appears in request errors.
const API_KEY_HEADER: &str = "x-goog-api-key";
const GENERATE_CONTENT_METHOD: &str = "generateContent";
const LIST_PAGE_SIZE: &str = "1000";

/// Configuration for the Gemini client
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout: Option<Duration>,
    /// Custom base URL for Gemini-compatible APIs
    /// Defaults to "https://generativelanguage.googleapis.com/v1beta" if not set
    pub base_url: Option<String>,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiConfig {
    fn with_api_key(api_key: String) -> Self {
        Self {
            api_key,
            temperature: None,
            max_tokens: None,
            timeout: None,
            base_url: None,
        }
    }
}

/// Gemini client speaking the `generativelanguage` REST API.
///
/// Implements [`GenerationClient`] and [`ModelListing`], so it can be handed
/// to a [`GeminiProvider`](crate::GeminiProvider).
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

// Gemini API request and response structures
#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

impl GenerationConfig {
    fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.max_output_tokens.is_none()
            && self.thinking_config.is_none()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
    /// Set on parts carrying the model's thought summary
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<RemoteModel>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteModel {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl RemoteModel {
    fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT_METHOD)
    }
}

impl GeminiClient {
    /// Create a new Gemini client with the provided API key.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Your Google Gemini API key
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use gemprompt::GeminiClient;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = GeminiClient::new("your-gemini-api-key")?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "gemini_client_new", skip(api_key))]
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(GemPromptError::ApiError(
                "API key cannot be empty. Use GeminiClient::from_env() to read from GEMINI_API_KEY environment variable.".to_string(),
            ));
        }

        info!("Created Gemini client");
        Ok(Self {
            config: GeminiConfig::with_api_key(api_key),
            client: reqwest::Client::new(),
        })
    }

    /// Create a new Gemini client by reading the API key from the `GEMINI_API_KEY` environment variable.
    ///
    /// A `.env` file in the working directory (or a parent) is loaded first if
    /// present; variables already set in the process take precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if `GEMINI_API_KEY` is not set or is empty.
    #[instrument(name = "gemini_client_from_env")]
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            trace!(error = %e, "No .env file loaded");
        }

        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            GemPromptError::ApiError(format!("{} environment variable is not set", API_KEY_ENV))
        })?;

        let client = Self::new(api_key)?;
        info!("Created Gemini client from environment variable");
        Ok(client)
    }

    /// Current configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn base_url_str(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
    }

    async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        thinking_config: Option<ThinkingConfig>,
    ) -> Result<String> {
        let generation_config = GenerationConfig {
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_tokens,
            thinking_config,
        };

        debug!("Building Gemini API request");
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: (!generation_config.is_empty()).then_some(generation_config),
        };

        let url = format!("{}/models/{}:generateContent", self.base_url_str(), model);
        debug!(url = %url, model, "Sending request to Gemini API");
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| handle_http_error(e, "Gemini"))?;

        let response = check_response_status(response, "Gemini").await?;

        debug!("Successfully received response from Gemini API");
        let completion: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse JSON response from Gemini API");
            e
        })?;

        let Some(candidate) = completion.candidates.into_iter().next() else {
            error!("Gemini API returned empty candidates array");
            return Err(GemPromptError::ApiError(
                "No completion candidates returned".to_string(),
            ));
        };
        trace!(finish_reason = ?candidate.finish_reason, "Completion finish reason");

        let text = response_text(candidate.content);
        match text {
            Some(text) => {
                debug!(
                    content_len = text.len(),
                    "Successfully extracted text content from response"
                );
                Ok(text)
            }
            None => {
                error!("No text content in Gemini response");
                Err(GemPromptError::ApiError(
                    "No text content in response".to_string(),
                ))
            }
        }
    }

    async fn fetch_model_page(&self, page_token: Option<&str>) -> Result<ListModelsResponse> {
        let url = format!("{}/models", self.base_url_str());
        let mut query = vec![("pageSize", LIST_PAGE_SIZE)];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        debug!(url = %url, page_token = ?page_token, "Listing Gemini models");
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| handle_http_error(e, "Gemini"))?;

        let response = check_response_status(response, "Gemini").await?;
        Ok(response.json().await?)
    }
}

/// Joins the non-thought text parts, the way the SDKs' `response.text` does.
fn response_text(content: Option<CandidateContent>) -> Option<String> {
    let texts: Vec<String> = content?
        .parts
        .into_iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text)
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

// Generate builder methods using macro
crate::impl_client_builder_methods! {
    client_type: GeminiClient,
    provider_name: "Gemini"
}

impl GeminiClient {
    /// Set a custom base URL for Gemini-compatible APIs.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL without trailing slash (e.g., "http://localhost:1234/v1beta" or "https://api.example.com/v1beta")
    #[tracing::instrument(skip(self, base_url))]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url_str = base_url.into();
        tracing::debug!(
            previous_base_url = ?self.config.base_url,
            new_base_url = %base_url_str,
            "Setting custom base URL"
        );
        self.config.base_url = Some(base_url_str);
        self
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    #[instrument(
        name = "gemini_generate",
        skip(self, prompt),
        fields(prompt_len = prompt.len())
    )]
    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        info!("Generating text response with Gemini");
        self.generate_content(model, prompt, None).await
    }

    #[instrument(
        name = "gemini_generate_with_budget",
        skip(self, prompt),
        fields(prompt_len = prompt.len())
    )]
    async fn generate_with_budget(
        &self,
        model: &str,
        prompt: &str,
        thinking_budget: u32,
    ) -> Result<String> {
        info!("Generating text response with Gemini thinking budget");
        self.generate_content(model, prompt, Some(ThinkingConfig { thinking_budget }))
            .await
    }
}

#[async_trait]
impl ModelListing for GeminiClient {
    #[instrument(name = "gemini_list_models", skip(self))]
    async fn list_models(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_model_page(page_token.as_deref()).await?;
            names.extend(
                page.models
                    .into_iter()
                    .filter(RemoteModel::supports_generation)
                    .map(|m| m.name),
            );

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = names.len(), "Listed Gemini models");
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_request_omits_generation_config() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hi".to_string(),
                }],
            }],
            generation_config: None,
        };
        let value = serde_json::to_value(&request).expect("serialization should succeed");
        assert_eq!(value, json!({"contents": [{"parts": [{"text": "hi"}]}]}));
    }

    #[test]
    fn test_thinking_config_uses_camel_case() {
        let config = GenerationConfig {
            thinking_config: Some(ThinkingConfig {
                thinking_budget: 4096,
            }),
            ..Default::default()
        };
        let value = serde_json::to_value(&config).expect("serialization should succeed");
        assert_eq!(value, json!({"thinkingConfig": {"thinkingBudget": 4096}}));
    }

    #[test]
    fn test_response_text_skips_thoughts() {
        let content: CandidateContent = serde_json::from_value(json!({
            "parts": [
                {"text": "pondering...", "thought": true},
                {"text": "Hello, "},
                {"text": "world"}
            ]
        }))
        .expect("deserialization should succeed");
        assert_eq!(response_text(Some(content)).as_deref(), Some("Hello, world"));
    }

    #[test]
    fn test_response_text_empty() {
        assert_eq!(response_text(None), None);
        let content: CandidateContent =
            serde_json::from_value(json!({"parts": [{"thought": true, "text": "x"}]}))
                .expect("deserialization should succeed");
        assert_eq!(response_text(Some(content)), None);
    }

    #[test]
    fn test_remote_model_generation_filter() {
        let page: ListModelsResponse = serde_json::from_value(json!({
            "models": [
                {"name": "models/gemini-2.5-flash", "supportedGenerationMethods": ["generateContent", "countTokens"]},
                {"name": "models/text-embedding-004", "supportedGenerationMethods": ["embedContent"]},
                {"name": "models/aqa"}
            ],
            "nextPageToken": "abc"
        }))
        .expect("deserialization should succeed");

        let names: Vec<_> = page
            .models
            .iter()
            .filter(|m| m.supports_generation())
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["models/gemini-2.5-flash"]);
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let client = GeminiClient::new("SECRET-KEY-123").expect("client should build");
        let debug = format!("{:?}", client.config());
        assert!(!debug.contains("SECRET-KEY-123"), "key leaked: {}", debug);
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(matches!(
            GeminiClient::new(""),
            Err(GemPromptError::ApiError(_))
        ));
    }
}
