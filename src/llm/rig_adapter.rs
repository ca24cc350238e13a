//! Bridge from rig's `CompletionModel` to our `LlmProvider` trait.

use async_trait::async_trait;
use rig::completion::message::AssistantContent;
use rig::completion::{CompletionError, CompletionModel, Message};
use tracing::{debug, info};

use crate::error::LlmError;

use super::provider::{CompletionRequest, CompletionResponse, LlmProvider};

/// Markers Google puts in 401/403 error bodies.
const AUTH_MARKERS: &[&str] = &[
    "UNAUTHENTICATED",
    "PERMISSION_DENIED",
    "API_KEY_INVALID",
    "401 Unauthorized",
    "403 Forbidden",
];

/// Wraps any rig completion model as an `LlmProvider`.
///
/// No timeout and no retry: a request blocks until the service answers.
pub struct RigAdapter<M> {
    model: M,
    model_name: String,
    provider: &'static str,
}

impl<M: CompletionModel> RigAdapter<M> {
    pub fn new(model: M, model_name: &str, provider: &'static str) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
            provider,
        }
    }
}

#[async_trait]
impl<M> LlmProvider for RigAdapter<M>
where
    M: CompletionModel + Send + Sync + 'static,
{
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(
            provider = self.provider,
            model = %self.model_name,
            prompt_chars = request.prompt.len(),
            "Sending completion request"
        );

        let response = self
            .model
            .completion_request(Message::user(request.prompt))
            .send()
            .await
            .map_err(|e| map_completion_error(self.provider, e))?;

        let content: String = response
            .choice
            .iter()
            .filter_map(|c| match c {
                AssistantContent::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect();
        if content.trim().is_empty() {
            return Err(LlmError::InvalidResponse {
                provider: self.provider.to_string(),
                reason: "completion contained no text".to_string(),
            });
        }

        info!(
            provider = self.provider,
            model = %self.model_name,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Generation complete"
        );
        Ok(CompletionResponse {
            content,
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
        })
    }
}

/// Sort a rig error into auth, malformed-response and transport failures.
pub(crate) fn map_completion_error(provider: &str, err: CompletionError) -> LlmError {
    let reason = err.to_string();
    if AUTH_MARKERS.iter().any(|m| reason.contains(m)) {
        return LlmError::AuthFailed {
            provider: provider.to_string(),
        };
    }
    match err {
        CompletionError::ResponseError(_) | CompletionError::JsonError(_) => {
            LlmError::InvalidResponse {
                provider: provider.to_string(),
                reason,
            }
        }
        _ => LlmError::RequestFailed {
            provider: provider.to_string(),
            reason,
        },
    }
}
