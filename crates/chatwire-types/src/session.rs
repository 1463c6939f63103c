//! Session and request/response bodies exchanged with the chat gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat session created by the gateway.
///
/// The identifier is opaque and server-assigned. Sessions are immutable once
/// created and are discarded client-side; there is no close call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub character_id: Option<String>,
    #[serde(default)]
    pub scenario_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A session known only by its identifier (e.g. passed on the command line).
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: None,
            character_id: None,
            scenario_id: None,
            created_at: None,
        }
    }
}

/// Body of `POST /session/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub user_id: String,
    pub character_id: String,
    pub scenario_id: String,
}

/// Response of `POST /session/create`. Only `session.id` binds later exchanges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session: Session,
    #[serde(default)]
    pub character: Option<CharacterSummary>,
    #[serde(default)]
    pub scenario: Option<ScenarioSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Scenario details returned alongside a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Opening line shown before the first exchange.
    #[serde(default)]
    pub first_message: Option<String>,
}

/// Body of the streamed `POST /chat/stream` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStreamRequest {
    pub session_id: String,
    pub text: String,
}
