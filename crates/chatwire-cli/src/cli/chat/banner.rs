//! Welcome banner display for chat sessions.

use console::style;

use chatwire_types::session::CreateSessionResponse;

/// Print the banner for a freshly created session: character, scenario and
/// session id, then the scenario's opening line if it has one.
pub fn print_welcome_banner(created: &CreateSessionResponse, api_base: &str) {
    let character = created
        .character
        .as_ref()
        .map(|c| c.name.clone().unwrap_or_else(|| c.id.clone()))
        .unwrap_or_else(|| "assistant".to_string());
    let scenario = created.scenario.as_ref();
    let session_id = &created.session.id;

    println!();
    println!("  {} {}", style("*").cyan(), style(&character).cyan().bold());
    if let Some(name) = scenario.and_then(|s| s.name.as_deref()) {
        println!("  {}", style(name).dim());
    }
    println!();
    println!("  {}  {}", style("Gateway:").bold(), style(api_base).dim());
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(session_id.get(..8).unwrap_or(session_id)).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+C stops a reply, Ctrl+D exits").dim()
    );
    println!("  {}", style("---").dim());
    println!();

    if let Some(first) = scenario.and_then(|s| s.first_message.as_deref()) {
        if !first.trim().is_empty() {
            println!("  {} {}", style("scenario:").magenta().bold(), first.trim());
            println!();
        }
    }
}
