//! Answer pipeline.
//!
//! Composes the language resolver, FAQ matcher, document extractor and
//! generative backend into a single "produce reply" operation per
//! inbound message. Every message reaches exactly one terminal reply;
//! sub-step failures degrade locally and never abort the pipeline or
//! corrupt other sessions.

use crate::config::{AdvisorSettings, DOCUMENT_PREFIX_CHARS};
use crate::extract::{self, DocumentFormat};
use crate::faq::KnowledgeBase;
use crate::journal::InteractionJournal;
use crate::lang::{self, Language};
use crate::llm::BackendClient;
use crate::report::{placeholder_report, PlaceholderReport};
use crate::session::{PendingDocument, Session, SessionStore};
use crate::utils::truncate_str;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrator owning per-session state transitions and the
/// composition of all answer sources.
pub struct AnswerPipeline {
    settings: Arc<AdvisorSettings>,
    knowledge: KnowledgeBase,
    backend: BackendClient,
    sessions: SessionStore,
    journal: InteractionJournal,
}

impl AnswerPipeline {
    /// Assemble the pipeline from its collaborators.
    #[must_use]
    pub fn new(
        settings: Arc<AdvisorSettings>,
        knowledge: KnowledgeBase,
        backend: BackendClient,
        journal: InteractionJournal,
    ) -> Self {
        Self {
            settings,
            knowledge,
            backend,
            sessions: SessionStore::new(),
            journal,
        }
    }

    /// Access the session store (tests and transport-side lookups).
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Produce a reply for a plain text message.
    ///
    /// Resolves the language, tries the FAQ first, and otherwise asks
    /// the generative backend, grounding the prompt on any pending
    /// document. Backend failure degrades to the per-language fallback
    /// message. The interaction is journaled unconditionally.
    pub async fn handle_text(&self, user_id: i64, raw: &str) -> String {
        let question = raw.trim();
        let session = self.sessions.snapshot(user_id).await;
        let language = self
            .resolve_language(user_id, &session, None, Some(question))
            .await;

        if let Some(hit) =
            self.knowledge
                .best_match(question, language, self.settings.faq_match_threshold)
        {
            debug!(user_id, score = hit.score, "FAQ hit, backend not invoked");
            self.journal.record(question, &hit.answer).await;
            return hit.answer;
        }

        let grounded = session.pending_document.is_some();
        let prompt = session.pending_document.as_ref().map_or_else(
            || question.to_string(),
            |doc| grounded_prompt(language, &doc.text, question),
        );

        let reply = match self.backend.answer(language, &prompt).await {
            Ok(answer) => {
                if grounded {
                    // Consumed only on success so a failed attempt can
                    // be retried without re-uploading.
                    self.sessions.clear_pending_document(user_id).await;
                }
                answer
            }
            Err(e) => {
                warn!(user_id, error = %e, "Backend failed, sending fallback message");
                self.settings.fallback_message(language)
            }
        };

        self.journal.record(question, &reply).await;
        reply
    }

    /// Ingest an uploaded document and return an acknowledgement.
    ///
    /// Unsupported extensions still acknowledge receipt but store
    /// nothing; supported formats are extracted eagerly and stored as
    /// the session's pending document, overwriting any previous one.
    pub async fn handle_document(&self, user_id: i64, bytes: &[u8], filename: &str) -> String {
        let session = self.sessions.snapshot(user_id).await;
        let language = session
            .language
            .unwrap_or_else(|| self.settings.default_language());

        let format = DocumentFormat::from_filename(filename);
        match extract::extract(bytes, format, filename) {
            Ok(text) => {
                info!(
                    user_id,
                    filename,
                    format = ?format,
                    chars = text.chars().count(),
                    "Document ingested"
                );
                self.sessions
                    .set_pending_document(user_id, PendingDocument { text, format })
                    .await;
                language.document_received_message(filename)
            }
            Err(e) => {
                warn!(user_id, filename, error = %e, "Unsupported document format");
                language.document_unsupported_message(filename)
            }
        }
    }

    /// Handle an explicit language-selection command.
    pub async fn set_language(&self, user_id: i64, argument: &str) -> String {
        let session = self.sessions.snapshot(user_id).await;
        match Language::parse(argument) {
            Some(language) => {
                self.sessions.set_language(user_id, language).await;
                info!(user_id, language = language.code(), "Language set explicitly");
                language.language_set_message()
            }
            None => {
                let current = session
                    .language
                    .unwrap_or_else(|| self.settings.default_language());
                current.language_usage_message().to_string()
            }
        }
    }

    /// Localized `/start` greeting.
    pub async fn welcome(&self, user_id: i64) -> String {
        let session = self.sessions.snapshot(user_id).await;
        session
            .language
            .unwrap_or_else(|| self.settings.default_language())
            .welcome_message()
            .to_string()
    }

    /// Build the placeholder export report in the session's language.
    pub async fn export_report(&self, user_id: i64, request: &str) -> PlaceholderReport {
        let session = self.sessions.snapshot(user_id).await;
        let language = session
            .language
            .unwrap_or_else(|| self.settings.default_language());
        placeholder_report(language, request)
    }

    /// Resolve the session language, persisting it when it was unset.
    async fn resolve_language(
        &self,
        user_id: i64,
        session: &Session,
        explicit: Option<Language>,
        sample: Option<&str>,
    ) -> Language {
        let resolved = lang::resolve(
            session.language,
            explicit,
            sample,
            self.settings.default_language(),
        );
        if session.language != Some(resolved) {
            self.sessions.set_language(user_id, resolved).await;
        }
        resolved
    }
}

/// Concatenate a bounded document prefix with the request text.
fn grounded_prompt(language: Language, document_text: &str, question: &str) -> String {
    let prefix = truncate_str(document_text, DOCUMENT_PREFIX_CHARS);
    format!(
        "{}\n{}\n\n{}",
        language.document_prompt_prefix(),
        prefix,
        question
    )
}
