pub mod client;
pub mod gemini;
mod utils;

pub use client::{GenerationClient, ModelListing};
pub use gemini::{GeminiClient, GeminiConfig};
pub(crate) use utils::{check_response_status, handle_http_error};
