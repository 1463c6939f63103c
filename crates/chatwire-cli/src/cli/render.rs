//! Terminal rendering of streamed replies.
//!
//! `ReplyPrinter` is a [`StreamObserver`]: the controller hands it the full
//! accumulated text on every change and it writes only the part not yet on
//! screen. A "thinking" spinner runs until the first text arrives.

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use chatwire_core::chat::{SessionSnapshot, StreamObserver};
use chatwire_types::exchange::StreamPhase;

/// Part of `text` not yet written, given `printed` bytes already written.
///
/// Falls back to the whole text when it no longer extends what was printed
/// (a new exchange started).
pub fn unprinted_suffix(printed: usize, text: &str) -> &str {
    text.get(printed..).unwrap_or(text)
}

struct PrintState<W> {
    out: W,
    printed: usize,
    spinner: Option<ProgressBar>,
}

/// Writes reply text incrementally to `W`.
pub struct ReplyPrinter<W> {
    state: Mutex<PrintState<W>>,
    show_spinner: bool,
}

impl<W: Write + Send> ReplyPrinter<W> {
    pub fn new(out: W, show_spinner: bool) -> Self {
        Self {
            state: Mutex::new(PrintState {
                out,
                printed: 0,
                spinner: None,
            }),
            show_spinner,
        }
    }

    /// Write text without a trailing newline (e.g. the speaker label).
    pub fn prefix(&self, text: &str) {
        let mut state = self.lock();
        let _ = write!(state.out, "{text}");
        let _ = state.out.flush();
    }

    /// Write a line outside of the streamed reply (headers, footers).
    pub fn line(&self, text: &str) {
        let mut state = self.lock();
        let _ = writeln!(state.out, "{text}");
        let _ = state.out.flush();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PrintState<W>> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

impl<W: Write + Send> StreamObserver for ReplyPrinter<W> {
    fn on_text(&self, text: &str) {
        let mut state = self.lock();
        if text.len() < state.printed {
            state.printed = 0;
        }
        let suffix = unprinted_suffix(state.printed, text);
        if suffix.is_empty() {
            return;
        }
        if let Some(spinner) = state.spinner.take() {
            spinner.finish_and_clear();
        }
        let _ = write!(state.out, "{suffix}");
        let _ = state.out.flush();
        state.printed = text.len();
    }

    fn on_streaming(&self, streaming: bool) {
        let mut state = self.lock();
        if streaming {
            state.printed = 0;
            if self.show_spinner {
                state.spinner = Some(thinking_spinner());
            }
        } else if let Some(spinner) = state.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

/// One-line footer shown after a reply: status, model and memory counters.
pub fn footer(snapshot: &SessionSnapshot) -> String {
    let status = match snapshot.phase {
        StreamPhase::Completed => style(snapshot.phase.status_label()).dim(),
        StreamPhase::Aborted => style(snapshot.phase.status_label()).yellow(),
        StreamPhase::Errored => style(snapshot.phase.status_label()).red(),
        _ => style(snapshot.phase.status_label()).dim(),
    };
    format!(
        "  {} {} {} {} {} {}",
        style("|").dim(),
        status,
        style("\u{00b7}").dim(),
        style(&snapshot.telemetry.model).dim(),
        style("\u{00b7}").dim(),
        style(snapshot.telemetry.memory).dim(),
    )
}

/// Multi-line telemetry summary for `/stats`.
pub fn stats_text(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n  {}   {}\n",
        style("Model:").bold(),
        snapshot.telemetry.model
    ));
    out.push_str(&format!(
        "  {}  {}\n",
        style("Memory:").bold(),
        snapshot.telemetry.memory
    ));
    out.push_str(&format!(
        "  {}  {}\n",
        style("Status:").bold(),
        snapshot.phase.status_label()
    ));
    if let Some(error) = &snapshot.last_error {
        out.push_str(&format!("  {}   {}\n", style("Error:").bold(), style(error).red()));
    }
    out
}
