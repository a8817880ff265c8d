//! Supported languages, automatic detection and localized strings.
//!
//! The assistant answers in one of a closed set of languages. A session
//! language is resolved once (explicit command, already-set value, or
//! detection over a text sample) and then sticks until explicitly
//! overridden.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A response language from the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Uzbek.
    Uz,
    /// Russian.
    Ru,
    /// English.
    En,
}

/// All supported languages, in canonical order.
pub const SUPPORTED_LANGUAGES: [Language; 3] = [Language::Uz, Language::Ru, Language::En];

impl Language {
    /// Parse a two-letter code, case-insensitively.
    /// Returns `None` for codes outside the supported set.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "uz" => Some(Self::Uz),
            "ru" => Some(Self::Ru),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    /// The two-letter language code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Uz => "uz",
            Self::Ru => "ru",
            Self::En => "en",
        }
    }

    /// English language name, used when instructing the backend.
    #[must_use]
    pub const fn english_name(self) -> &'static str {
        match self {
            Self::Uz => "Uzbek",
            Self::Ru => "Russian",
            Self::En => "English",
        }
    }

    /// Built-in "cannot answer" message shown when the backend fails.
    #[must_use]
    pub const fn default_fallback_message(self) -> &'static str {
        match self {
            Self::Uz => "Kechirasiz, hozir javob bera olmayman. Keyinroq qayta urinib ko'ring.",
            Self::Ru => "Извините, сейчас я не могу ответить. Попробуйте позже.",
            Self::En => "Sorry, I cannot answer right now. Please try again later.",
        }
    }

    /// Greeting shown on `/start`.
    #[must_use]
    pub const fn welcome_message(self) -> &'static str {
        match self {
            Self::Uz => {
                "Assalomu alaykum! Savolingizni yozing yoki hujjat (PDF, Excel) yuboring. \
                 Tilni /language uz|ru|en buyrug'i bilan o'zgartirish mumkin."
            }
            Self::Ru => {
                "Здравствуйте! Задайте вопрос или отправьте документ (PDF, Excel). \
                 Язык ответов можно сменить командой /language uz|ru|en."
            }
            Self::En => {
                "Hello! Ask a question or send a document (PDF, Excel). \
                 Change the reply language with /language uz|ru|en."
            }
        }
    }

    /// Confirmation after an explicit language change.
    #[must_use]
    pub fn language_set_message(self) -> String {
        match self {
            Self::Uz => format!("Til o'rnatildi: {}", self.code()),
            Self::Ru => format!("Язык установлен: {}", self.code()),
            Self::En => format!("Language set: {}", self.code()),
        }
    }

    /// Usage hint for the language command.
    #[must_use]
    pub const fn language_usage_message(self) -> &'static str {
        match self {
            Self::Uz => "Foydalanish: /language uz|ru|en",
            Self::Ru => "Использование: /language uz|ru|en",
            Self::En => "Usage: /language uz|ru|en",
        }
    }

    /// Acknowledgement after ingesting a supported document.
    #[must_use]
    pub fn document_received_message(self, filename: &str) -> String {
        match self {
            Self::Uz => format!("Fayl qabul qilindi: {filename}. Endi hujjat bo'yicha savol bering."),
            Self::Ru => format!("Файл получен: {filename}. Теперь задайте вопрос по документу."),
            Self::En => format!("File received: {filename}. Now ask a question about the document."),
        }
    }

    /// Acknowledgement for an unsupported document format. The file is
    /// named but nothing is ingested.
    #[must_use]
    pub fn document_unsupported_message(self, filename: &str) -> String {
        match self {
            Self::Uz => format!(
                "Fayl qabul qilindi: {filename}, lekin bu format qo'llab-quvvatlanmaydi \
                 (faqat PDF va Excel)."
            ),
            Self::Ru => format!(
                "Файл получен: {filename}, но этот формат не поддерживается \
                 (только PDF и Excel)."
            ),
            Self::En => format!(
                "File received: {filename}, but this format is not supported \
                 (PDF and Excel only)."
            ),
        }
    }

    /// Lead-in line placed before document text in a grounded prompt.
    #[must_use]
    pub const fn document_prompt_prefix(self) -> &'static str {
        match self {
            Self::Uz => "Mana hujjat ma'lumotlari:",
            Self::Ru => "Вот данные документа:",
            Self::En => "Here is the document data:",
        }
    }

    /// System instruction sent to the generative backend.
    #[must_use]
    pub fn system_instruction(self) -> String {
        format!(
            "You are a financial and legal assistant. Respond in {}, clearly and concisely.",
            self.english_name()
        )
    }
}

/// Resolve the active language for a session.
///
/// Precedence: an explicit command argument wins (idempotent override);
/// otherwise an already-set session language is returned unchanged;
/// otherwise the language is detected from `sample`, falling back to
/// `default` on detector failure or a detection outside the supported
/// set. The caller persists the result into the session so detection
/// runs at most once per session.
#[must_use]
pub fn resolve(
    session_language: Option<Language>,
    explicit: Option<Language>,
    sample: Option<&str>,
    default: Language,
) -> Language {
    if let Some(language) = explicit {
        return language;
    }
    if let Some(language) = session_language {
        return language;
    }
    sample.map_or(default, |text| detect(text).unwrap_or(default))
}

/// Detect a supported language from a text sample.
/// Returns `None` when the detector fails or detects an unsupported
/// language; callers fall back to the configured default.
#[must_use]
pub fn detect(text: &str) -> Option<Language> {
    let info = whatlang::detect(text)?;
    let language = match info.lang() {
        whatlang::Lang::Uzb => Language::Uz,
        whatlang::Lang::Rus => Language::Ru,
        whatlang::Lang::Eng => Language::En,
        other => {
            debug!(detected = other.code(), "Detected unsupported language");
            return None;
        }
    };
    Some(language)
}
