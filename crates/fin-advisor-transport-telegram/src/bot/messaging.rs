//! Common messaging utilities for the Telegram bot.
//!
//! Reusable functions for sending formatted answers, including long
//! message splitting and Markdown-to-HTML conversion.

use anyhow::Result;
use fin_advisor_core::utils;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};

/// Maximum message length for Telegram with safety margin.
/// Telegram's official limit is 4096, but we use 4000 to account for
/// HTML tags added during formatting.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4000;

/// Sends a long answer by splitting it into multiple messages.
///
/// The raw Markdown is split first so that ``` fences stay balanced in
/// every part, then each part is converted to Telegram-safe HTML.
///
/// # Errors
///
/// Returns an error if any message fails to send.
pub async fn send_long_message(bot: &Bot, chat_id: ChatId, text: &str) -> Result<()> {
    let parts = utils::split_long_message(text, TELEGRAM_MESSAGE_LIMIT);

    for part in parts {
        let formatted = utils::format_text(&part);
        bot.send_message(chat_id, formatted)
            .parse_mode(ParseMode::Html)
            .await?;
    }

    Ok(())
}
