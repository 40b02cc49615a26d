//! Typed events delivered over the streaming endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::Card;

/// Events on a registration stream. The first two frames a client sees are
/// `session_created` and `full_games_list`, both addressed only to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    SessionCreated { session_id: String },
    FullGamesList { game_ids: Vec<String> },
    GameCreated { game_id: String },
    GameDeleted { game_id: String },
}

/// One frame on a game stream. Carries the game id so a client can
/// multiplex several games over separate streams without ambiguity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub game_id: String,
    #[serde(flatten)]
    pub detail: GameEventDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEventDetail {
    PlayerJoined {
        name: String,
    },
    PlayerLeft {
        name: String,
    },
    GameReadyToStart,
    GameStarted,
    CardPlayed,
    YourTurn,
    TrickCompleted {
        trick: Vec<Card>,
        winning_card: Card,
        winner_id: String,
        winner_name: String,
    },
    GameFinished,
    GameAborted,
    BroadcastMessage {
        text: String,
    },
}

impl GameEventDetail {
    /// Terminal events end the stream that carries them.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GameEventDetail::GameFinished | GameEventDetail::GameAborted
        )
    }
}
