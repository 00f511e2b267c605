use async_trait::async_trait;

use crate::error::Result;

/// GenerationClient is the seam between prompt dispatch and the remote service.
///
/// Implementations send a single prompt to a named model and return the
/// response text. The model name passed in is always a base model; any
/// `:<budget>` directive has already been stripped by the caller.
///
/// The library ships [`GeminiClient`](crate::GeminiClient), which talks to the
/// Gemini REST API. Tests and alternative transports can provide their own.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use gemprompt::{GeminiClient, GenerationClient};
///
/// let client = GeminiClient::from_env()?;
///
/// let plain = client.generate("gemini-2.0-flash", "Name three rivers").await?;
/// let deliberate = client
///     .generate_with_budget("gemini-2.5-flash", "Prove there are infinitely many primes", 4096)
///     .await?;
///
/// println!("{}\n---\n{}", plain, deliberate);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Plain completion without any thinking configuration.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String>;

    /// Completion with an explicit thinking budget, in tokens.
    async fn generate_with_budget(
        &self,
        model: &str,
        prompt: &str,
        thinking_budget: u32,
    ) -> Result<String>;
}

/// ModelListing reports the models the remote service can generate content with.
#[async_trait]
pub trait ModelListing: Send + Sync {
    /// Model identifiers as the service reports them, possibly namespaced
    /// (e.g. `models/gemini-2.5-flash`).
    async fn list_models(&self) -> Result<Vec<String>>;
}
