//! Append-only interaction journal.
//!
//! Records every question/answer pair, including degraded answers, as
//! plain text: `Q: <text>` / `A: <text>` followed by a blank line.
//! This is diagnostics, not control flow: a failed write is logged and
//! swallowed so it never blocks reply delivery.

use std::path::Path;
use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Errors that can occur when opening the journal.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The journal file could not be opened for appending.
    #[error("journal open error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only question/answer journal over a single shared file.
/// Concurrent writers are serialized so each record is appended whole.
pub struct InteractionJournal {
    file: Mutex<File>,
}

impl InteractionJournal {
    /// Open (or create) the journal file for appending.
    ///
    /// # Errors
    ///
    /// Returns a `JournalError` if the file cannot be opened.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .await?;
        info!(path = %path.as_ref().display(), "Interaction journal opened");
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Append one question/answer record. Never fails: write errors are
    /// logged at `warn` and ignored.
    pub async fn record(&self, question: &str, answer: &str) {
        let entry = format!("Q: {question}\nA: {answer}\n\n");
        let mut file = self.file.lock().await;
        if let Err(e) = file.write_all(entry.as_bytes()).await {
            warn!(error = %e, "Failed to append interaction record");
            return;
        }
        if let Err(e) = file.flush().await {
            warn!(error = %e, "Failed to flush interaction journal");
        }
    }
}
