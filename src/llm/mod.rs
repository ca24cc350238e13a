//! LLM integration.
//!
//! The report composer only needs one thing from a model: a single prompt in,
//! a single prose completion out. `LlmProvider` is that seam. Gemini is
//! reached through rig-core, and `RigAdapter` bridges rig's `CompletionModel`
//! trait to `LlmProvider`.

pub mod provider;
mod rig_adapter;

pub use provider::*;
pub use rig_adapter::RigAdapter;

use std::sync::Arc;

use rig::client::CompletionClient;
use secrecy::ExposeSecret;

use crate::error::LlmError;

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
/// Default public Gemini endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: secrecy::SecretString,
    pub model: String,
    pub base_url: String,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    if config.model.trim().is_empty() {
        return Err(LlmError::RequestFailed {
            provider: "gemini".to_string(),
            reason: "model name is empty".to_string(),
        });
    }
    create_gemini_provider(config)
}

fn create_gemini_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    use rig::providers::gemini;

    let client: gemini::Client = gemini::Client::builder()
        .api_key(config.api_key.expose_secret())
        .base_url(config.base_url.as_str())
        .build()
        .map_err(|e| LlmError::RequestFailed {
            provider: "gemini".to_string(),
            reason: format!("Failed to create Gemini client: {}", e),
        })?;

    let model = client.completion_model(&config.model);
    tracing::info!("Using Gemini (model: {})", config.model);
    Ok(Arc::new(RigAdapter::new(model, &config.model, "gemini")))
}
