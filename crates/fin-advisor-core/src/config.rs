//! Configuration and settings management
//!
//! Loads settings from environment variables and optional config files,
//! and defines fixed generation parameters.

use crate::lang::Language;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Build the layered configuration shared by all crates.
///
/// Merges optional `config/{default,RUN_MODE,local}` files with
/// environment variables. Empty environment variables are treated as
/// unset.
///
/// # Errors
///
/// Returns a `ConfigError` if building the configuration fails.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Local overrides, not checked into git.
        .add_source(File::with_name("config/local").required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        // Plain uppercase env vars as well (BACKEND_API_KEY, FAQ_PATH, ...).
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

/// Core assistant settings loaded from environment variables.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdvisorSettings {
    /// API key for the generative backend.
    pub backend_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible backend endpoint.
    #[serde(default = "default_backend_api_base")]
    pub backend_api_base: String,

    /// Model name used for answer generation.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Bounded timeout for a single backend call, in seconds.
    #[serde(default = "default_backend_timeout_secs")]
    pub backend_timeout_secs: u64,

    /// Default response language code when detection fails.
    #[serde(default = "default_language_code")]
    pub default_language: String,

    /// Path to the FAQ knowledge base file (YAML).
    #[serde(default = "default_faq_path")]
    pub faq_path: String,

    /// Minimum FAQ overlap score required to return a canned answer.
    #[serde(default = "default_faq_match_threshold")]
    pub faq_match_threshold: f64,

    /// Path of the append-only interaction log file.
    #[serde(default = "default_interaction_log_path")]
    pub interaction_log_path: String,

    /// Override for the Uzbek "cannot answer" message.
    pub fallback_message_uz: Option<String>,
    /// Override for the Russian "cannot answer" message.
    pub fallback_message_ru: Option<String>,
    /// Override for the English "cannot answer" message.
    pub fallback_message_en: Option<String>,
}

fn default_backend_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4".to_string()
}

const fn default_backend_timeout_secs() -> u64 {
    45
}

fn default_language_code() -> String {
    "ru".to_string()
}

fn default_faq_path() -> String {
    "config/faq.yaml".to_string()
}

const fn default_faq_match_threshold() -> f64 {
    0.5
}

fn default_interaction_log_path() -> String {
    "interactions.log".to_string()
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            backend_api_key: None,
            backend_api_base: default_backend_api_base(),
            chat_model: default_chat_model(),
            backend_timeout_secs: default_backend_timeout_secs(),
            default_language: default_language_code(),
            faq_path: default_faq_path(),
            faq_match_threshold: default_faq_match_threshold(),
            interaction_log_path: default_interaction_log_path(),
            fallback_message_uz: None,
            fallback_message_ru: None,
            fallback_message_en: None,
        }
    }
}

impl AdvisorSettings {
    /// Create new settings by loading from environment and files.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        build_config()?.try_deserialize()
    }

    /// Returns the configured default language, falling back to Russian
    /// when the configured code is not in the supported set.
    #[must_use]
    pub fn default_language(&self) -> Language {
        Language::parse(&self.default_language).unwrap_or(Language::Ru)
    }

    /// Returns the "cannot answer" message for the given language,
    /// preferring a configured override over the built-in string.
    #[must_use]
    pub fn fallback_message(&self, language: Language) -> String {
        let configured = match language {
            Language::Uz => self.fallback_message_uz.as_ref(),
            Language::Ru => self.fallback_message_ru.as_ref(),
            Language::En => self.fallback_message_en.as_ref(),
        };
        configured.map_or_else(
            || language.default_fallback_message().to_string(),
            Clone::clone,
        )
    }
}

/// Sampling temperature for answer generation. Low and fixed; not
/// user-controllable.
pub const CHAT_TEMPERATURE: f32 = 0.2;

/// Maximum output tokens for a generated answer.
pub const MAX_ANSWER_TOKENS: u32 = 400;

/// Number of leading document characters included in a grounded prompt.
pub const DOCUMENT_PREFIX_CHARS: usize = 1500;
