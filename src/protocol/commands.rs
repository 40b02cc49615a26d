//! Request and response bodies for the unary command routes.

use serde::{Deserialize, Serialize};

use crate::domain::Phase;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameResponse {
    pub game_id: String,
}

/// Query for listing games: an optional comma-separated phase filter,
/// e.g. `?phases=preparing,playing`. No filter lists everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListGamesQuery {
    pub phases: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListGamesResponse {
    pub games: Vec<GameSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: String,
    pub phase: Phase,
    pub player_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameActionRequest {
    pub session_id: String,
    pub action: GameAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameAction {
    ReadyToStart,
    LeaveGame,
    PlayCard { card: String },
}

/// Command-surface result: 0 is success, anything else carries a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub code: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            code: 0,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionQuery {
    pub session_id: Option<String>,
}
