//! Main chat loop orchestration.
//!
//! Session bootstrap, welcome banner, silent intro turn, then the input loop.
//! While a reply streams the loop keeps reading input so Ctrl+C or `/stop`
//! can cancel it.

use std::sync::Arc;

use anyhow::anyhow;
use console::style;
use rustyline_async::SharedWriter;
use tracing::{info, warn};

use chatwire_core::chat::StreamController;
use chatwire_infra::http::HttpStreamTransport;
use chatwire_types::exchange::ExchangeStatus;

use crate::cli::render::{ReplyPrinter, footer, stats_text};
use crate::cli::session::open_session;
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

type Printer = ReplyPrinter<SharedWriter>;

/// What the user asked for while a reply was streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterReply {
    Continue,
    Exit,
}

/// Run the interactive chat loop.
pub async fn run_chat_loop(
    state: &AppState,
    character: Option<String>,
    scenario: Option<String>,
    no_intro: bool,
) -> anyhow::Result<()> {
    let created = open_session(state, character, scenario).await?;
    print_welcome_banner(&created, state.gateway.base_url());

    let speaker = created
        .character
        .as_ref()
        .and_then(|c| c.name.clone())
        .unwrap_or_else(|| "Bot".to_string());

    let controller = StreamController::new(state.gateway.stream_transport());
    controller.bind_session(created.session.clone())?;
    info!(session_id = %created.session.id, "chat started");

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, writer) =
        ChatInput::new(prompt).map_err(|e| anyhow!("Failed to initialize input: {e}"))?;
    let printer = Arc::new(ReplyPrinter::new(writer, true));
    controller.subscribe(printer.clone());

    let mut exit = false;
    if !no_intro {
        if let Some(intro) = state.config.intro() {
            exit = stream_reply(&controller, &mut chat_input, &printer, &speaker, intro).await?
                == AfterReply::Exit;
        }
    }

    while !exit {
        match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                printer.line(&format!(
                    "  {}",
                    style("Nothing is streaming. Press Ctrl+D to exit, or keep chatting.").dim()
                ));
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => printer.line(&commands::help_text()),
                        ChatCommand::Clear => chat_input.clear(),
                        ChatCommand::Stop => printer.line(&format!(
                            "  {}",
                            style("Nothing is streaming.").dim()
                        )),
                        ChatCommand::Stats => printer.line(&stats_text(&controller.snapshot())),
                        ChatCommand::Exit => break,
                        ChatCommand::Unknown(name) => printer.line(&format!(
                            "\n  {} Unknown command: {}. Type /help for available commands.\n",
                            style("?").yellow().bold(),
                            style(name).dim()
                        )),
                    }
                    continue;
                }

                exit = stream_reply(&controller, &mut chat_input, &printer, &speaker, &text)
                    .await?
                    == AfterReply::Exit;
            }
        }
    }

    printer.line(&format!("\n  {}", style("Session ended.").dim()));
    chat_input.flush();
    Ok(())
}

/// Send `text` and stream the reply, handling input until it finishes.
async fn stream_reply(
    controller: &StreamController<HttpStreamTransport>,
    chat_input: &mut ChatInput,
    printer: &Printer,
    speaker: &str,
    text: &str,
) -> anyhow::Result<AfterReply> {
    printer.prefix(&format!("\n  {} ", style(speaker).cyan().bold()));

    let sender = controller.clone();
    let message = text.to_string();
    let mut task = tokio::spawn(async move { sender.send(&message).await });
    let mut after = AfterReply::Continue;

    let joined = loop {
        tokio::select! {
            joined = &mut task => break joined,
            event = chat_input.read_line() => match event {
                InputEvent::Interrupted => {
                    controller.cancel();
                }
                InputEvent::Eof => {
                    controller.cancel();
                    after = AfterReply::Exit;
                }
                InputEvent::Message(line) => match commands::parse(&line) {
                    Some(ChatCommand::Stop) => {
                        controller.cancel();
                    }
                    Some(ChatCommand::Exit) => {
                        controller.cancel();
                        after = AfterReply::Exit;
                    }
                    _ if line.is_empty() => {}
                    _ => printer.line(&format!(
                        "\n  {}",
                        style("A reply is streaming. Ctrl+C or /stop to stop it.").dim()
                    )),
                },
            },
        }
    };

    match joined? {
        Ok(report) => {
            printer.line("");
            printer.line(&footer(&controller.snapshot()));
            if report.status == ExchangeStatus::Errored {
                let error = report.last_error.as_deref().unwrap_or("unknown error");
                warn!(error = %error, "reply failed");
                printer.line(&format!(
                    "  {} {error}\n  {}",
                    style("!").red().bold(),
                    style("Type a message to retry, /exit to quit.").dim()
                ));
            }
            printer.line("");
        }
        Err(err) => {
            printer.line(&format!("\n  {} {err}\n", style("!").yellow().bold()));
        }
    }

    Ok(after)
}
