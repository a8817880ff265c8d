//! OpenAI-compatible provider.
//!
//! Works against any endpoint speaking the OpenAI chat-completion wire
//! shape; the base URL is configuration, which keeps the adapter
//! provider-agnostic.

use super::{BackendError, GenerativeBackend};
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

/// Provider for OpenAI-compatible chat-completion APIs.
pub struct OpenAiCompatProvider {
    client: Client<OpenAIConfig>,
    temperature: f32,
}

impl OpenAiCompatProvider {
    /// Create a provider for the given key and base URL.
    #[must_use]
    pub fn new(api_key: String, api_base: String, temperature: f32) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self {
            client: Client::with_config(config),
            temperature,
        }
    }
}

fn map_error(error: impl std::fmt::Display) -> BackendError {
    BackendError::Api(error.to_string())
}

#[async_trait]
impl GenerativeBackend for OpenAiCompatProvider {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model_id: &str,
        max_tokens: u32,
    ) -> Result<String, BackendError> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(map_error)?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(map_error)?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(model_id)
            .messages(messages)
            .max_tokens(max_tokens)
            .temperature(self.temperature)
            .build()
            .map_err(map_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_error)?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(BackendError::Empty)
    }
}
