//! Telegram runtime entrypoint.

use crate::bot;
use crate::bot::handlers::Command;
use crate::config::BotSettings;
use fin_advisor_core::faq::KnowledgeBase;
use fin_advisor_core::journal::InteractionJournal;
use fin_advisor_core::llm::BackendClient;
use fin_advisor_core::pipeline::AnswerPipeline;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::{error, info, warn};

/// Run the Telegram transport runtime.
pub async fn run_bot(settings: Arc<BotSettings>) {
    let pipeline = Arc::new(init_pipeline(&settings).await);
    info!("Answer pipeline initialized.");

    let bot = Bot::new(settings.telegram.telegram_token.clone());
    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![pipeline, settings])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn init_pipeline(settings: &BotSettings) -> AnswerPipeline {
    let backend = match BackendClient::from_settings(settings.advisor.as_ref()) {
        Ok(client) => {
            info!("Backend client initialized.");
            client
        }
        Err(e) => {
            error!("Failed to initialize backend client: {e}");
            std::process::exit(1);
        }
    };

    let knowledge = match KnowledgeBase::load(&settings.advisor.faq_path) {
        Ok(kb) => {
            info!("Knowledge base loaded ({} entries).", kb.len());
            kb
        }
        Err(e) => {
            warn!("Knowledge base unavailable ({e}); every question goes to the backend.");
            KnowledgeBase::default()
        }
    };

    let journal = match InteractionJournal::open(&settings.advisor.interaction_log_path).await {
        Ok(journal) => {
            info!(
                "Interaction log opened at {}.",
                settings.advisor.interaction_log_path
            );
            journal
        }
        Err(e) => {
            error!("Failed to open interaction log: {e}");
            std::process::exit(1);
        }
    };

    AnswerPipeline::new(settings.advisor.clone(), knowledge, backend, journal)
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            dptree::filter(|msg: Message| msg.document().is_some())
                .endpoint(handle_incoming_document),
        )
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some()).endpoint(handle_incoming_text),
        )
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    pipeline: Arc<AnswerPipeline>,
) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start => bot::handlers::start(bot, msg, pipeline).await,
        Command::Language(argument) => bot::handlers::language(bot, msg, pipeline, argument).await,
        Command::Export(request) => bot::handlers::export(bot, msg, pipeline, request).await,
        Command::Healthcheck => bot::handlers::healthcheck(bot, msg).await,
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_incoming_text(
    bot: Bot,
    msg: Message,
    pipeline: Arc<AnswerPipeline>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::handle_text(bot, msg, pipeline).await {
        error!("Text handler error: {}", e);
    }
    respond(())
}

async fn handle_incoming_document(
    bot: Bot,
    msg: Message,
    pipeline: Arc<AnswerPipeline>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::handle_document(bot, msg, pipeline).await {
        error!("Document handler error: {}", e);
    }
    respond(())
}
