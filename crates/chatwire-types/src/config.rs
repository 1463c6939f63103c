//! Client configuration types for chatwire.
//!
//! `ClientConfig` represents `config.toml` in the data directory. Every field
//! has a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Gateway the web client talks to when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "https://aichatbot-ez4g.onrender.com";

/// Silent opening turn sent right after a session is created.
pub const DEFAULT_INTRO_MESSAGE: &str = "시작";

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the chat gateway, without trailing slash.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Bare user identifier sent on session creation.
    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub default_character_id: Option<String>,

    #[serde(default)]
    pub default_scenario_id: Option<String>,

    /// Message sent without echo after session creation. Empty disables it.
    #[serde(default = "default_intro_message")]
    pub intro_message: String,

    /// Connect timeout for gateway requests. The reply stream itself has no
    /// idle timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_intro_message() -> String {
    DEFAULT_INTRO_MESSAGE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            user_id: None,
            default_character_id: None,
            default_scenario_id: None,
            intro_message: default_intro_message(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Base URL with any trailing slashes removed.
    pub fn normalized_api_base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    /// The intro message, or `None` when disabled.
    pub fn intro(&self) -> Option<&str> {
        let intro = self.intro_message.trim();
        if intro.is_empty() { None } else { Some(intro) }
    }
}
