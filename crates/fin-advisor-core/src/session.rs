//! Per-user session store.
//!
//! Sessions are created on first contact and keyed by the transport's
//! user identifier. Each session owns at most one pending extracted
//! document; a new upload overwrites it (last write wins). Messages for
//! the same session are assumed serialized by the upstream transport,
//! so the store only guarantees consistency of individual operations.

use crate::extract::DocumentFormat;
use crate::lang::Language;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Extracted document text bound to one session until consumed or
/// cleared.
#[derive(Debug, Clone)]
pub struct PendingDocument {
    /// Full extracted text (possibly empty when extraction degraded).
    pub text: String,
    /// Format the document was ingested as.
    pub format: DocumentFormat,
}

/// Conversational state for a single user.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Resolved response language, unset until first resolution.
    pub language: Option<Language>,
    /// Document awaiting the next question, if any.
    pub pending_document: Option<PendingDocument>,
}

/// Keyed session store. The lock is held only for the duration of a
/// single read or write, never across a backend call.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, Session>>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone the session for `user_id`, creating it on first contact.
    pub async fn snapshot(&self, user_id: i64) -> Session {
        let mut sessions = self.sessions.lock().await;
        sessions.entry(user_id).or_default().clone()
    }

    /// Set the session language.
    pub async fn set_language(&self, user_id: i64, language: Language) {
        let mut sessions = self.sessions.lock().await;
        sessions.entry(user_id).or_default().language = Some(language);
    }

    /// Store a pending document, overwriting any previous one.
    pub async fn set_pending_document(&self, user_id: i64, document: PendingDocument) {
        let mut sessions = self.sessions.lock().await;
        sessions.entry(user_id).or_default().pending_document = Some(document);
    }

    /// Clear the pending document after a successful grounded answer.
    pub async fn clear_pending_document(&self, user_id: i64) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(&user_id) {
            session.pending_document = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> PendingDocument {
        PendingDocument {
            text: text.to_string(),
            format: DocumentFormat::Pdf,
        }
    }

    #[tokio::test]
    async fn test_created_on_first_contact() {
        let store = SessionStore::new();
        let session = store.snapshot(1).await;
        assert!(session.language.is_none());
        assert!(session.pending_document.is_none());
    }

    #[tokio::test]
    async fn test_pending_document_last_write_wins() {
        let store = SessionStore::new();
        store.set_pending_document(1, doc("first")).await;
        store.set_pending_document(1, doc("second")).await;
        let session = store.snapshot(1).await;
        assert_eq!(
            session.pending_document.expect("document present").text,
            "second"
        );
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        store.set_language(1, Language::Uz).await;
        store.set_pending_document(1, doc("data")).await;
        let other = store.snapshot(2).await;
        assert!(other.language.is_none());
        assert!(other.pending_document.is_none());
    }

    #[tokio::test]
    async fn test_clear_pending_document() {
        let store = SessionStore::new();
        store.set_pending_document(1, doc("data")).await;
        store.clear_pending_document(1).await;
        assert!(store.snapshot(1).await.pending_document.is_none());
        // Clearing an unknown session is a no-op.
        store.clear_pending_document(99).await;
    }
}
