//! gemprompt: text prompts for Google Gemini, with thinking budgets in the model name
//!
//! # Overview
//!
//! A model name may carry a reasoning-budget directive after a colon:
//!
//! - `gemini-2.5-flash:4k` → 4096 thinking tokens
//! - `gemini-2.5-flash:4096` → 4096 thinking tokens
//! - `gemini-2.5-flash:4` → 4096 thinking tokens (bare values under 100 are thousands)
//! - `gemini-2.5-pro:0` → 1024 (thinking can't be disabled on 2.5 Pro)
//!
//! Budgets are clamped to `0..=24576`. Directives on models without
//! configurable thinking, or in an unrecognized shape, are logged and ignored;
//! parsing never fails.
//!
//! [`GeminiProvider`] parses the directive, sends the request through an
//! injected [`GenerationClient`], and lists models through [`ModelListing`]
//! with a built-in fallback list.
//!
//! # Quick Start
//!
//! ```no_run
//! use gemprompt::{GeminiClient, GeminiProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::from_env()?.temperature(0.2);
//!     let provider = GeminiProvider::new(client);
//!
//!     let answer = provider
//!         .prompt("Explain tail recursion in two sentences", "gemini-2.5-flash:2k")
//!         .await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```
mod backend;
pub mod directive;
mod error;
#[cfg(feature = "logging")]
pub mod logging;
mod provider;

// Re-exports for convenience
pub use backend::{GeminiClient, GeminiConfig, GenerationClient, ModelListing};
pub use directive::{ModelDirective, parse_thinking_suffix, supports_thinking_budget};
pub use error::{GemPromptError, Result};
pub use provider::{FALLBACK_MODELS, GeminiProvider, MODEL_NAME_PREFIX, strip_model_prefix};
