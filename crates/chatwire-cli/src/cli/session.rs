//! Session CLI commands.

use anyhow::{Context, Result};
use console::style;

use chatwire_types::config::ClientConfig;
use chatwire_types::session::{CreateSessionRequest, CreateSessionResponse};

use crate::state::AppState;

/// Fill in a session request from flags, falling back to config defaults.
pub fn build_request(
    config: &ClientConfig,
    character: Option<String>,
    scenario: Option<String>,
) -> Result<CreateSessionRequest> {
    let user_id = config.user_id.clone().context(
        "no user id configured. Pass --user, set CHATWIRE_USER_ID, or add user_id to config.toml",
    )?;
    let character_id = character
        .or_else(|| config.default_character_id.clone())
        .context("no character selected. Pass --character or set default_character_id")?;
    let scenario_id = scenario
        .or_else(|| config.default_scenario_id.clone())
        .context("no scenario selected. Pass --scenario or set default_scenario_id")?;

    Ok(CreateSessionRequest {
        user_id,
        character_id,
        scenario_id,
    })
}

/// Create a session on the gateway.
pub async fn open_session(
    state: &AppState,
    character: Option<String>,
    scenario: Option<String>,
) -> Result<CreateSessionResponse> {
    let request = build_request(&state.config, character, scenario)?;
    let created = state
        .gateway
        .create_session(&request)
        .await
        .with_context(|| format!("failed to create session at {}", state.gateway.base_url()))?;
    Ok(created)
}

/// `chatwire session create`: create a session and print it.
///
/// # Examples
///
/// ```bash
/// chatwire session create --character chr_01 --scenario scn_01
/// chatwire session create --json
/// ```
pub async fn create_session(
    state: &AppState,
    character: Option<String>,
    scenario: Option<String>,
    json: bool,
) -> Result<()> {
    let created = open_session(state, character, scenario).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&created)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Session created: {}",
        style("✓").green().bold(),
        style(&created.session.id).cyan().bold()
    );
    if let Some(character) = &created.character {
        println!(
            "  {}  {}",
            style("Character:").bold(),
            style(character.name.as_deref().unwrap_or(&character.id)).dim()
        );
    }
    if let Some(scenario) = &created.scenario {
        if let Some(name) = &scenario.name {
            println!("  {}   {}", style("Scenario:").bold(), style(name).dim());
        }
    }
    println!();
    println!(
        "  {}",
        style(format!(
            "Send with: chatwire send --session {} <text>",
            created.session.id
        ))
        .dim()
    );
    println!();
    Ok(())
}
