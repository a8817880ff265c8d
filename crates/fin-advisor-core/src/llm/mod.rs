//! Generative backend adapter.
//!
//! Provides a provider-agnostic interface to an LLM completion service.
//! The concrete provider is an OpenAI-compatible HTTP API; custom
//! providers can be registered behind the [`GenerativeBackend`] trait,
//! and every call carries a bounded timeout.

mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use crate::config::{AdvisorSettings, CHAT_TEMPERATURE, MAX_ANSWER_TOKENS};
use crate::lang::Language;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during a backend completion call.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error returned by the provider, including transport failures.
    #[error("API error: {0}")]
    Api(String),
    /// The call exceeded the configured timeout.
    #[error("Backend call timed out after {0:?}")]
    Timeout(Duration),
    /// The response is missing the expected answer field.
    #[error("Empty response from backend")]
    Empty,
    /// Missing provider configuration or API key.
    #[error("Missing backend configuration: {0}")]
    MissingConfig(String),
}

/// Interface for generative text-completion providers.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate a completion for `user_prompt` under `system_prompt`.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model_id: &str,
        max_tokens: u32,
    ) -> Result<String, BackendError>;
}

/// Client wrapping a provider with model selection and a bounded
/// timeout. Failures of any kind are typed; the pipeline degrades them
/// to a fixed per-language fallback message.
pub struct BackendClient {
    provider: Arc<dyn GenerativeBackend>,
    model: String,
    timeout: Duration,
}

impl BackendClient {
    /// Create a client from settings, using the OpenAI-compatible
    /// provider against the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::MissingConfig` when no API key is set.
    pub fn from_settings(settings: &AdvisorSettings) -> Result<Self, BackendError> {
        let api_key = settings
            .backend_api_key
            .clone()
            .ok_or_else(|| BackendError::MissingConfig("backend_api_key".to_string()))?;
        let provider = OpenAiCompatProvider::new(
            api_key,
            settings.backend_api_base.clone(),
            CHAT_TEMPERATURE,
        );
        Ok(Self::with_provider(
            Arc::new(provider),
            settings.chat_model.clone(),
            Duration::from_secs(settings.backend_timeout_secs),
        ))
    }

    /// Create a client around an arbitrary provider (used for tests and
    /// alternative backends).
    #[must_use]
    pub fn with_provider(
        provider: Arc<dyn GenerativeBackend>,
        model: String,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            model,
            timeout,
        }
    }

    /// Generate an answer in the given language.
    ///
    /// The system instruction is derived from the language; the call is
    /// aborted after the configured timeout, which is treated like any
    /// other backend failure. No automatic retries.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` on provider failure, timeout, or an
    /// empty response.
    pub async fn answer(&self, language: Language, prompt: &str) -> Result<String, BackendError> {
        let system_prompt = language.system_instruction();
        debug!(
            model = %self.model,
            language = language.code(),
            prompt_chars = prompt.chars().count(),
            "Sending request to generative backend"
        );

        let start = std::time::Instant::now();
        let result = tokio::time::timeout(
            self.timeout,
            self.provider
                .complete(&system_prompt, prompt, &self.model, MAX_ANSWER_TOKENS),
        )
        .await
        .unwrap_or(Err(BackendError::Timeout(self.timeout)));

        match &result {
            Ok(_) => debug!(
                model = %self.model,
                duration_ms = start.elapsed().as_millis(),
                "Received answer from backend"
            ),
            Err(e) => warn!(
                model = %self.model,
                duration_ms = start.elapsed().as_millis(),
                error = %e,
                "Backend request failed"
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowBackend;

    #[async_trait::async_trait]
    impl GenerativeBackend for SlowBackend {
        async fn complete(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            _model_id: &str,
            _max_tokens: u32,
        ) -> Result<String, BackendError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_maps_to_backend_error() {
        let client = BackendClient::with_provider(
            Arc::new(SlowBackend),
            "test-model".to_string(),
            Duration::from_millis(100),
        );
        let err = client
            .answer(Language::Ru, "вопрос")
            .await
            .expect_err("must time out");
        assert!(matches!(err, BackendError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_system_instruction_carries_language() {
        let mut mock = MockGenerativeBackend::new();
        mock.expect_complete()
            .withf(|system, _, _, _| system.contains("Uzbek"))
            .returning(|_, _, _, _| Ok("javob".to_string()));
        let client = BackendClient::with_provider(
            Arc::new(mock),
            "test-model".to_string(),
            Duration::from_secs(5),
        );
        let answer = client
            .answer(Language::Uz, "savol")
            .await
            .expect("mock answers");
        assert_eq!(answer, "javob");
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = BackendClient::from_settings(&AdvisorSettings::default())
            .map(|_| ())
            .expect_err("no key configured");
        assert!(matches!(err, BackendError::MissingConfig(_)));
    }
}
