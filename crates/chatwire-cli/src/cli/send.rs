//! One-shot send: stream a single reply to stdout.

use std::sync::Arc;

use anyhow::{Result, bail};
use console::style;

use chatwire_core::chat::StreamController;
use chatwire_types::exchange::ExchangeStatus;
use chatwire_types::session::Session;

use crate::state::AppState;

use super::render::{ReplyPrinter, footer};

/// `chatwire send --session ID TEXT`.
///
/// Ctrl+C stops the reply; what arrived so far stays printed. Exits with an
/// error when the exchange ends in `errored`.
pub async fn send_once(state: &AppState, session_id: &str, text: &str, json: bool) -> Result<()> {
    let controller = StreamController::new(state.gateway.stream_transport());
    controller.bind_session(Session::from_id(session_id))?;

    if !json {
        controller.subscribe(Arc::new(ReplyPrinter::new(std::io::stdout(), true)));
    }

    let sender = controller.clone();
    let text = text.to_string();
    let mut task = tokio::spawn(async move { sender.send(&text).await });

    let report = loop {
        tokio::select! {
            joined = &mut task => break joined??,
            _ = tokio::signal::ctrl_c() => {
                if controller.cancel() {
                    tracing::info!("reply stopped by user");
                }
            }
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        println!("{}", footer(&controller.snapshot()));
        if let (ExchangeStatus::Ok, Some(error)) = (report.status, &report.last_error) {
            eprintln!("  {} {error}", style("!").yellow().bold());
        }
    }

    if report.status == ExchangeStatus::Errored {
        bail!(
            "stream error: {}",
            report.last_error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}
