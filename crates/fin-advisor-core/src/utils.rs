//! Utility functions shared across crates.

use lazy_regex::regex;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Safely truncates a string to a maximum character length (not bytes).
/// UTF-8 safe; will not panic on multi-byte characters.
#[must_use]
pub fn truncate_str(s: impl AsRef<str>, max_chars: usize) -> String {
    let s = s.as_ref();
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    s.char_indices()
        .nth(max_chars)
        .map_or_else(|| s.to_string(), |(pos, _)| s[..pos].to_string())
}

/// Convert Markdown-ish model output to Telegram-safe HTML.
///
/// Code fences become `<pre><code>` blocks, inline code becomes
/// `<code>`, `**bold**` and `*italic*` become `<b>`/`<i>`, leading `* `
/// bullets become `•`. Everything inside code spans is entity-escaped.
#[must_use]
pub fn format_text(text: &str) -> String {
    let mut out = regex!(r"```(\w+)?\n?([\s\S]*?)```")
        .replace_all(text, |caps: &regex::Captures| {
            let lang = caps.get(1).map_or("", |m| m.as_str());
            let code = caps.get(2).map_or("", |m| m.as_str()).trim_end();
            format!(
                "<pre><code class=\"{lang}\">{}</code></pre>",
                html_escape::encode_text(code)
            )
        })
        .to_string();

    out = regex!(r"`([^`\n]+)`")
        .replace_all(&out, |caps: &regex::Captures| {
            let code = caps.get(1).map_or("", |m| m.as_str());
            format!("<code>{}</code>", html_escape::encode_text(code))
        })
        .to_string();

    out = regex!(r"\*\*([^*]+)\*\*").replace_all(&out, "<b>$1</b>").to_string();
    out = regex!(r"\*([^*\n]+)\*").replace_all(&out, "<i>$1</i>").to_string();
    out = regex!(r"(?m)^\* ").replace_all(&out, "• ").to_string();
    out = regex!(r"\n{3,}").replace_all(&out, "\n\n").to_string();

    out.trim().to_string()
}

/// Split a long message into parts no longer than `max_length`
/// characters, keeping Markdown code fences balanced in every part.
#[must_use]
pub fn split_long_message(message: &str, max_length: usize) -> Vec<String> {
    if message.is_empty() {
        return Vec::new();
    }
    if message.chars().count() <= max_length {
        return vec![message.to_string()];
    }

    const FENCE: &str = "```";
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_code_block = false;

    for line in message.lines() {
        if current.chars().count() + line.chars().count() + 1 > max_length && !current.is_empty() {
            if in_code_block {
                current.push_str(FENCE);
                current.push('\n');
            }
            parts.push(current.trim_end().to_string());
            current = String::new();
            if in_code_block {
                current.push_str(FENCE);
                current.push('\n');
            }
        }
        if line.starts_with(FENCE) {
            in_code_block = !in_code_block;
        }
        current.push_str(line);
        current.push('\n');
    }

    if !current.trim().is_empty() {
        if in_code_block {
            current.push_str(FENCE);
        }
        parts.push(current.trim_end().to_string());
    }

    parts
}

/// Retry a transport operation with exponential backoff.
///
/// Intended for Telegram file downloads and sends, where transient
/// network errors are common. Three attempts with 500ms, 1s delays.
///
/// # Errors
///
/// Returns the last error once all attempts are exhausted.
pub async fn retry_transport_operation<T, F, Fut>(mut operation: F) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    const MAX_ATTEMPTS: u32 = 3;
    const INITIAL_BACKOFF_MS: u64 = 500;

    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < MAX_ATTEMPTS => {
                let backoff = Duration::from_millis(INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1));
                warn!(
                    attempt,
                    max_attempts = MAX_ATTEMPTS,
                    backoff_ms = backoff.as_millis(),
                    error = %e,
                    "Transport operation failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
