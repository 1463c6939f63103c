//! CLI command definitions for the `chatwire` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod render;
pub mod send;
pub mod session;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Stream replies from a chat gateway in your terminal.
#[derive(Parser)]
#[command(name = "chatwire", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Gateway base URL (overrides config.toml and CHATWIRE_API_BASE).
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// User identifier sent on session creation.
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Export exchange spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter derived from `-v` / `--quiet`.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,chatwire_core=debug,chatwire_infra=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat: creates a session, then streams replies.
    Chat {
        /// Character to chat with (defaults to default_character_id).
        #[arg(long)]
        character: Option<String>,

        /// Scenario to play (defaults to default_scenario_id).
        #[arg(long)]
        scenario: Option<String>,

        /// Skip the silent opening message sent after session creation.
        #[arg(long)]
        no_intro: bool,
    },

    /// Send one message to an existing session and stream the reply to stdout.
    Send {
        /// Session identifier returned by `session create`.
        #[arg(long, short)]
        session: String,

        /// Message text.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Manage gateway sessions.
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Create a new session and print its identifier.
    Create {
        #[arg(long)]
        character: Option<String>,

        #[arg(long)]
        scenario: Option<String>,
    },
}
