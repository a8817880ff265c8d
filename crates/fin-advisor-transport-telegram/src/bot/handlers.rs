//! Command and message handlers.

use crate::bot::messaging::send_long_message;
use anyhow::{anyhow, Result};
use fin_advisor_core::pipeline::AnswerPipeline;
use fin_advisor_core::utils::retry_transport_operation;
use std::sync::Arc;
use teloxide::{
    net::Download,
    prelude::*,
    types::{ChatAction, InputFile},
    utils::command::BotCommands,
};
use tracing::info;

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
#[must_use]
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Greet the user and show what the bot can do
    #[command(description = "Start the bot.")]
    Start,
    /// Pin the reply language for this chat
    #[command(description = "Set the reply language: uz, ru or en.")]
    Language(String),
    /// Produce a report document for a request
    #[command(description = "Export a report for the given request.")]
    Export(String),
    /// Check bot health
    #[command(description = "Check bot health.")]
    Healthcheck,
}

/// Handle the `/start` command.
///
/// # Errors
///
/// Returns an error if sending the greeting fails.
pub async fn start(bot: Bot, msg: Message, pipeline: Arc<AnswerPipeline>) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    info!("User {user_id} started the bot.");
    let greeting = pipeline.welcome(user_id).await;
    bot.send_message(msg.chat.id, greeting).await?;
    Ok(())
}

/// Handle the `/language` command.
///
/// # Errors
///
/// Returns an error if sending the confirmation fails.
pub async fn language(
    bot: Bot,
    msg: Message,
    pipeline: Arc<AnswerPipeline>,
    argument: String,
) -> Result<()> {
    let reply = pipeline.set_language(get_user_id_safe(&msg), &argument).await;
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Handle the `/export` command: send a generated report as a file.
///
/// # Errors
///
/// Returns an error if sending the document fails.
pub async fn export(
    bot: Bot,
    msg: Message,
    pipeline: Arc<AnswerPipeline>,
    request: String,
) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    bot.send_chat_action(msg.chat.id, ChatAction::UploadDocument)
        .await?;
    let report = pipeline.export_report(user_id, &request).await;
    bot.send_document(
        msg.chat.id,
        InputFile::memory(report.bytes).file_name(report.filename),
    )
    .await?;
    Ok(())
}

/// Handle the `/healthcheck` command.
///
/// # Errors
///
/// Returns an error if sending the response fails.
pub async fn healthcheck(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, "OK").await?;
    Ok(())
}

/// Handle a plain text question.
///
/// # Errors
///
/// Returns an error if the message carries no text or sending fails.
pub async fn handle_text(bot: Bot, msg: Message, pipeline: Arc<AnswerPipeline>) -> Result<()> {
    let text = msg.text().ok_or_else(|| anyhow!("No text found"))?;
    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let answer = pipeline.handle_text(get_user_id_safe(&msg), text).await;
    send_long_message(&bot, msg.chat.id, &answer).await
}

/// Handle an uploaded document: download it and hand the bytes to the
/// pipeline for extraction.
///
/// # Errors
///
/// Returns an error if the download fails after retries or sending the
/// acknowledgement fails.
pub async fn handle_document(bot: Bot, msg: Message, pipeline: Arc<AnswerPipeline>) -> Result<()> {
    let document = msg.document().ok_or_else(|| anyhow!("No document found"))?;
    let filename = document
        .file_name
        .clone()
        .unwrap_or_else(|| "document".to_string());

    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    // Download with retry logic
    let buffer = retry_transport_operation(|| async {
        let file = bot.get_file(document.file.id.clone()).await?;
        let mut buf = Vec::new();
        bot.download_file(&file.path, &mut buf).await?;
        Ok(buf)
    })
    .await?;

    let ack = pipeline
        .handle_document(get_user_id_safe(&msg), &buffer, &filename)
        .await;
    bot.send_message(msg.chat.id, ack).await?;
    Ok(())
}
