//! Command grammar checks, no network involved.

use fin_advisor_transport_telegram::bot::handlers::Command;
use teloxide::utils::command::BotCommands;

const BOT_NAME: &str = "fin_advisor_bot";

#[test]
fn parses_start() {
    assert!(matches!(
        Command::parse("/start", BOT_NAME),
        Ok(Command::Start)
    ));
}

#[test]
fn parses_language_with_code() {
    match Command::parse("/language ru", BOT_NAME) {
        Ok(Command::Language(code)) => assert_eq!(code, "ru"),
        other => panic!("unexpected parse result: {other:?}"),
    }
}

#[test]
fn parses_export_with_free_text_request() {
    match Command::parse("/export quarterly balance report", BOT_NAME) {
        Ok(Command::Export(request)) => assert_eq!(request, "quarterly balance report"),
        other => panic!("unexpected parse result: {other:?}"),
    }
}

#[test]
fn parses_healthcheck() {
    assert!(matches!(
        Command::parse("/healthcheck", BOT_NAME),
        Ok(Command::Healthcheck)
    ));
}

#[test]
fn rejects_unknown_command() {
    assert!(Command::parse("/frobnicate", BOT_NAME).is_err());
}
