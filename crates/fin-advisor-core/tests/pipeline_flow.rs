//! End-to-end pipeline behavior with a scripted backend.

use fin_advisor_core::config::{AdvisorSettings, DOCUMENT_PREFIX_CHARS};
use fin_advisor_core::extract::DocumentFormat;
use fin_advisor_core::faq::KnowledgeBase;
use fin_advisor_core::journal::InteractionJournal;
use fin_advisor_core::lang::Language;
use fin_advisor_core::llm::{BackendClient, BackendError, GenerativeBackend};
use fin_advisor_core::pipeline::AnswerPipeline;
use fin_advisor_core::session::PendingDocument;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const FAQ_YAML: &str = concat!(
    "ru:\n",
    "  \"как открыть счет в банке\": \"Откройте счет в мобильном приложении.\"\n",
    "  \"как закрыть счет\": \"Обратитесь в отделение банка.\"\n",
    "en:\n",
    "  \"how to open account\": \"Open an account in the mobile app.\"\n",
);

/// Backend that records every prompt and replies with a fixed answer,
/// or fails when `fail` is set.
struct ScriptedBackend {
    prompts: Arc<Mutex<Vec<String>>>,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait::async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn complete(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
        _model_id: &str,
        _max_tokens: u32,
    ) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .expect("prompt lock")
            .push(user_prompt.to_string());
        if self.fail {
            Err(BackendError::Api("injected outage".to_string()))
        } else {
            Ok("Generated answer".to_string())
        }
    }
}

struct Harness {
    pipeline: AnswerPipeline,
    prompts: Arc<Mutex<Vec<String>>>,
    calls: Arc<AtomicUsize>,
    _dir: tempfile::TempDir,
    log_path: std::path::PathBuf,
}

async fn harness(fail: bool) -> Harness {
    let dir = tempfile::tempdir().expect("tempdir");
    let log_path = dir.path().join("interactions.log");
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = ScriptedBackend {
        prompts: prompts.clone(),
        calls: calls.clone(),
        fail,
    };
    let pipeline = AnswerPipeline::new(
        Arc::new(AdvisorSettings::default()),
        KnowledgeBase::from_yaml_str(FAQ_YAML).expect("test yaml"),
        BackendClient::with_provider(
            Arc::new(backend),
            "test-model".to_string(),
            Duration::from_secs(5),
        ),
        InteractionJournal::open(&log_path).await.expect("journal"),
    );
    Harness {
        pipeline,
        prompts,
        calls,
        _dir: dir,
        log_path,
    }
}

#[tokio::test]
async fn faq_hit_returns_canned_answer_without_backend() {
    let h = harness(false).await;
    let reply = h.pipeline.handle_text(1, "как открыть счет в банке").await;
    assert_eq!(reply, "Откройте счет в мобильном приложении.");
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn faq_miss_falls_through_to_backend() {
    let h = harness(false).await;
    let reply = h.pipeline.handle_text(1, "когда будет дождь").await;
    assert_eq!(reply, "Generated answer");
    assert_eq!(h.calls.load(Ordering::SeqCst), 1);
    let prompts = h.prompts.lock().expect("prompt lock");
    assert_eq!(prompts[0], "когда будет дождь");
}

#[tokio::test]
async fn backend_outage_degrades_to_configured_fallback_and_is_journaled() {
    let h = harness(true).await;
    h.pipeline.set_language(1, "ru").await;
    let reply = h.pipeline.handle_text(1, "когда будет дождь").await;
    assert_eq!(reply, Language::Ru.default_fallback_message());

    let log = tokio::fs::read_to_string(&h.log_path).await.expect("log");
    assert!(log.contains("Q: когда будет дождь"));
    assert!(log.contains(&format!("A: {}", Language::Ru.default_fallback_message())));
}

#[tokio::test]
async fn pending_document_grounds_the_prompt_up_to_limit() {
    let h = harness(false).await;
    h.pipeline.set_language(7, "en").await;
    let long_text = "x".repeat(DOCUMENT_PREFIX_CHARS + 2500);
    h.pipeline
        .sessions()
        .set_pending_document(
            7,
            PendingDocument {
                text: long_text,
                format: DocumentFormat::Pdf,
            },
        )
        .await;

    let reply = h.pipeline.handle_text(7, "what is the total?").await;
    assert_eq!(reply, "Generated answer");

    let prompts = h.prompts.lock().expect("prompt lock");
    let prompt = &prompts[0];
    assert_eq!(
        prompt.chars().filter(|&c| c == 'x').count(),
        DOCUMENT_PREFIX_CHARS
    );
    assert!(prompt.ends_with("what is the total?"));
    drop(prompts);

    // Consumed by the successful grounded answer.
    let session = h.pipeline.sessions().snapshot(7).await;
    assert!(session.pending_document.is_none());
}

#[tokio::test]
async fn failed_grounded_answer_keeps_the_document_for_retry() {
    let h = harness(true).await;
    h.pipeline.set_language(7, "en").await;
    h.pipeline
        .sessions()
        .set_pending_document(
            7,
            PendingDocument {
                text: "important figures".to_string(),
                format: DocumentFormat::Spreadsheet,
            },
        )
        .await;

    let reply = h.pipeline.handle_text(7, "summarize").await;
    assert_eq!(reply, Language::En.default_fallback_message());

    let session = h.pipeline.sessions().snapshot(7).await;
    assert!(
        session.pending_document.is_some(),
        "document must survive a failed attempt"
    );
}

#[tokio::test]
async fn unsupported_upload_acknowledges_but_stores_nothing() {
    let h = harness(false).await;
    h.pipeline.set_language(3, "en").await;
    let ack = h.pipeline.handle_document(3, b"bytes", "notes.docx").await;
    assert!(ack.contains("notes.docx"));

    // The follow-up question is treated as a plain request.
    let reply = h.pipeline.handle_text(3, "so what now").await;
    assert_eq!(reply, "Generated answer");
    let prompts = h.prompts.lock().expect("prompt lock");
    assert_eq!(prompts[0], "so what now");
}

#[tokio::test]
async fn broken_pdf_upload_still_grounds_with_empty_text() {
    let h = harness(false).await;
    h.pipeline.set_language(4, "en").await;
    let ack = h.pipeline.handle_document(4, b"not a pdf", "scan.pdf").await;
    assert!(ack.contains("scan.pdf"));

    let session = h.pipeline.sessions().snapshot(4).await;
    let doc = session.pending_document.expect("document stored");
    assert!(doc.text.is_empty());
    assert_eq!(doc.format, DocumentFormat::Pdf);
}

#[tokio::test]
async fn language_sticks_once_resolved() {
    let h = harness(false).await;
    h.pipeline.set_language(5, "en").await;
    // Russian text does not flip an explicitly set language.
    let _ = h.pipeline.handle_text(5, "когда будет дождь").await;
    let session = h.pipeline.sessions().snapshot(5).await;
    assert_eq!(session.language, Some(Language::En));
}

#[tokio::test]
async fn invalid_language_argument_returns_usage_hint() {
    let h = harness(false).await;
    let reply = h.pipeline.set_language(6, "klingon").await;
    assert!(reply.contains("/language uz|ru|en"));
    let session = h.pipeline.sessions().snapshot(6).await;
    assert!(session.language.is_none());
}

#[tokio::test]
async fn export_report_is_localized_placeholder() {
    let h = harness(false).await;
    h.pipeline.set_language(8, "en").await;
    let report = h.pipeline.export_report(8, "quarterly balance").await;
    let body = String::from_utf8(report.bytes).expect("utf8");
    assert!(body.contains("quarterly balance"));
    assert!(body.contains("placeholder"));
}
