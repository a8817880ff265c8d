#![deny(missing_docs)]
//! Fin Advisor core library.
//!
//! Transport-agnostic logic for the multilingual financial assistant:
//! language resolution, FAQ matching, document extraction, the
//! generative backend adapter and the answer pipeline.

/// Configuration management.
pub mod config;
/// Document text extraction (PDF, spreadsheets).
pub mod extract;
/// FAQ knowledge base and matcher.
pub mod faq;
/// Append-only interaction journal.
pub mod journal;
/// Supported languages, detection and localized strings.
pub mod lang;
/// Generative backend adapter.
pub mod llm;
/// Answer pipeline orchestration.
pub mod pipeline;
/// Placeholder report export.
pub mod report;
/// Per-user session store.
pub mod session;
/// Utility functions.
pub mod utils;

#[cfg(test)]
pub mod testing;
