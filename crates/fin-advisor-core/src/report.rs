//! Placeholder report export.
//!
//! The document-export feature is intentionally a stub: it emits a
//! boilerplate plain-text report naming the request, not the output of
//! a real report engine.

use crate::lang::Language;

/// Generated placeholder report: filename and file bytes.
#[derive(Debug, Clone)]
pub struct PlaceholderReport {
    /// Suggested filename for delivery.
    pub filename: String,
    /// Plain-text report body as bytes.
    pub bytes: Vec<u8>,
}

/// Build a boilerplate report document for the given request text.
#[must_use]
pub fn placeholder_report(language: Language, request: &str) -> PlaceholderReport {
    let request = if request.trim().is_empty() {
        "-"
    } else {
        request.trim()
    };
    let body = match language {
        Language::Uz => format!(
            "HISOBOT (namuna)\n\nSo'rov: {request}\n\nBu bo'lim hali tayyorlanmoqda. \
             To'liq hisobotlar keyingi versiyada paydo bo'ladi.\n"
        ),
        Language::Ru => format!(
            "ОТЧЕТ (заготовка)\n\nЗапрос: {request}\n\nЭтот раздел еще в разработке. \
             Полные отчеты появятся в следующей версии.\n"
        ),
        Language::En => format!(
            "REPORT (placeholder)\n\nRequest: {request}\n\nThis section is still under \
             development. Full reports will arrive in a later version.\n"
        ),
    };
    PlaceholderReport {
        filename: "report.txt".to_string(),
        bytes: body.into_bytes(),
    }
}
