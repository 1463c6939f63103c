//! Slash command parsing for the chat loop.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Stop the reply that is streaming.
    Stop,
    /// Show model, memory counters and stream status.
    Stats,
    /// Exit the chat.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/stop" => Some(ChatCommand::Stop),
        "/stats" | "/status" => Some(ChatCommand::Stats),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Help text listing all available commands.
pub fn help_text() -> String {
    let rows = [
        ("/help", "Show this help message"),
        ("/stop", "Stop the reply that is streaming"),
        ("/stats", "Show model, memory counters and status"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat"),
    ];
    let mut out = format!("\n  {}\n\n", style("Available commands:").bold());
    for (name, description) in rows {
        out.push_str(&format!("  {} {description}\n", style(format!("{name:<8}")).cyan()));
    }
    out.push_str(&format!(
        "\n  {}\n",
        style("Ctrl+C stops a streaming reply, Ctrl+D exits").dim()
    ));
    out
}
