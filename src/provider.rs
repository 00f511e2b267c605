//! Prompt dispatch over an injected Gemini client.

use tracing::{error, info, instrument};

use crate::backend::{GeminiClient, GenerationClient, ModelListing};
use crate::directive::ModelDirective;
use crate::error::{GemPromptError, Result};

/// Namespace the Gemini API puts in front of model identifiers.
pub const MODEL_NAME_PREFIX: &str = "models/";

/// Known Gemini models, returned by [`GeminiProvider::list_models`] when the
/// remote listing fails.
pub const FALLBACK_MODELS: &[&str] = &[
    // Gemini 2.5, thinking support
    "gemini-2.5-pro",
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.5-flash-preview-04-17",
    // Gemini 2.0
    "gemini-2.0-flash",
    "gemini-2.0-flash-thinking",
    // Gemini 1.5
    "gemini-1.5-pro",
    "gemini-1.5-pro-latest",
    "gemini-1.5-flash",
    "gemini-1.5-flash-latest",
    // Legacy
    "gemini-1.0-pro",
];

/// Removes the `models/` namespace from an identifier, if present.
pub fn strip_model_prefix(name: &str) -> &str {
    name.strip_prefix(MODEL_NAME_PREFIX).unwrap_or(name)
}

/// Sends prompts to Gemini, honoring `:<budget>` directives in model names.
///
/// The provider owns whatever client it is given; construct one with
/// [`GeminiProvider::new`] or, for the bundled HTTP client,
/// [`GeminiProvider::from_env`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use gemprompt::GeminiProvider;
///
/// let provider = GeminiProvider::from_env()?;
///
/// // 4096 thinking tokens on gemini-2.5-flash
/// let answer = provider.prompt("Why is the sky blue?", "gemini-2.5-flash:4k").await?;
/// println!("{}", answer);
///
/// for model in provider.list_models().await {
///     println!("{}", model);
/// }
/// # Ok(())
/// # }
/// ```
pub struct GeminiProvider<C> {
    client: C,
}

impl<C> GeminiProvider<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_client(self) -> C {
        self.client
    }
}

impl GeminiProvider<GeminiClient> {
    /// Build a provider around a [`GeminiClient`] configured from `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(GeminiClient::from_env()?))
    }
}

impl<C: GenerationClient> GeminiProvider<C> {
    /// Send a prompt, parsing any thinking directive out of `model` first.
    ///
    /// A positive budget selects [`GeminiProvider::prompt_with_thinking`];
    /// otherwise a plain request is made against the base model.
    ///
    /// # Errors
    ///
    /// Any client failure is reported as [`GemPromptError::ProviderFailure`].
    #[instrument(name = "gemini_prompt", skip(self, text), fields(prompt_len = text.len()))]
    pub async fn prompt(&self, text: &str, model: &str) -> Result<String> {
        let directive = ModelDirective::parse(model);
        if directive.has_budget() {
            return self
                .prompt_with_thinking(text, &directive.base_model, directive.thinking_budget)
                .await;
        }

        info!(model = %directive.base_model, "Sending prompt to Gemini model");
        self.client
            .generate(&directive.base_model, text)
            .await
            .map_err(|e| {
                error!(error = %e, "Error sending prompt to Gemini");
                GemPromptError::ProviderFailure(format!(
                    "Failed to get response from Gemini: {}",
                    e
                ))
            })
    }

    /// Send a prompt to `model` (a base model, no directive) with an explicit
    /// thinking budget.
    #[instrument(name = "gemini_prompt_with_thinking", skip(self, text), fields(prompt_len = text.len()))]
    pub async fn prompt_with_thinking(
        &self,
        text: &str,
        model: &str,
        thinking_budget: u32,
    ) -> Result<String> {
        info!(
            model,
            thinking_budget, "Sending prompt to Gemini model with thinking budget"
        );
        self.client
            .generate_with_budget(model, text, thinking_budget)
            .await
            .map_err(|e| {
                error!(error = %e, "Error sending prompt with thinking to Gemini");
                GemPromptError::ProviderFailure(format!(
                    "Failed to get response from Gemini with thinking: {}",
                    e
                ))
            })
    }
}

impl<C: ModelListing> GeminiProvider<C> {
    /// Models available for content generation, without the `models/` prefix.
    ///
    /// Never fails: if the remote listing errors, [`FALLBACK_MODELS`] is
    /// returned instead.
    #[instrument(name = "gemini_provider_list_models", skip(self))]
    pub async fn list_models(&self) -> Vec<String> {
        info!("Listing Gemini models");
        match self.client.list_models().await {
            Ok(models) => models
                .iter()
                .map(|name| strip_model_prefix(name).to_string())
                .collect(),
            Err(e) => {
                error!(error = %e, "Error listing Gemini models");
                info!("Returning hardcoded list of known Gemini models");
                FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_model_prefix() {
        assert_eq!(strip_model_prefix("models/gemini-2.5-flash"), "gemini-2.5-flash");
        assert_eq!(strip_model_prefix("gemini-2.5-flash"), "gemini-2.5-flash");
        assert_eq!(
            strip_model_prefix("tunedModels/my-model"),
            "tunedModels/my-model"
        );
    }

    #[test]
    fn test_fallback_models_cover_thinking_models() {
        for model in crate::directive::THINKING_ENABLED_MODELS {
            assert!(
                FALLBACK_MODELS.contains(model),
                "{} missing from fallback list",
                model
            );
        }
    }
}
