//! chatwire command-line entry point.
//!
//! Binary name: `chatwire`
//!
//! Parses CLI arguments, sets up tracing, loads client configuration, then
//! dispatches to the selected command.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, SessionCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or logging
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatwire", &mut std::io::stdout());
        return Ok(());
    }

    let filter = cli.log_filter();
    chatwire_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;

    chatwire_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init(cli.api_base.clone(), cli.user.clone()).await?;

    match cli.command {
        Commands::Chat {
            character,
            scenario,
            no_intro,
        } => {
            cli::chat::loop_runner::run_chat_loop(&state, character, scenario, no_intro).await?;
        }

        Commands::Send { session, text } => {
            let text = text.join(" ");
            cli::send::send_once(&state, &session, &text, cli.json).await?;
        }

        Commands::Session { action } => match action {
            SessionCommand::Create {
                character,
                scenario,
            } => {
                cli::session::create_session(&state, character, scenario, cli.json).await?;
            }
        },

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
