//! Error codes for the command surface.
//!
//! Add new codes here; never pass ad-hoc strings as error codes. Each
//! variant maps to a stable SCREAMING_SNAKE_CASE string and a non-zero
//! numeric status used by the action route.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Session id is not registered
    SessionNotFound,
    /// Game id does not exist
    GameNotFound,
    /// Game already has four players
    GameFull,
    /// Session already holds a seat or observer slot in this game
    AlreadyInGame,
    /// Requester is not seated in this game
    NotAPlayer,
    /// Operation not allowed in the game's current phase
    PhaseMismatch,
    /// Not this player's turn
    OutOfTurn,
    /// Card is not in the player's hand
    CardNotInHand,
    /// Card is not legal for the current trick
    IllegalPlay,
    /// Card text did not parse
    ParseCard,
    /// Malformed request
    BadRequest,
    /// Server-side configuration problem
    ConfigError,
    /// Internal failure
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::GameNotFound => "GAME_NOT_FOUND",
            ErrorCode::GameFull => "GAME_FULL",
            ErrorCode::AlreadyInGame => "ALREADY_IN_GAME",
            ErrorCode::NotAPlayer => "NOT_A_PLAYER",
            ErrorCode::PhaseMismatch => "PHASE_MISMATCH",
            ErrorCode::OutOfTurn => "OUT_OF_TURN",
            ErrorCode::CardNotInHand => "CARD_NOT_IN_HAND",
            ErrorCode::IllegalPlay => "ILLEGAL_PLAY",
            ErrorCode::ParseCard => "PARSE_CARD",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Numeric status for the action route; 0 is reserved for success.
    pub fn status(&self) -> u32 {
        match self {
            ErrorCode::SessionNotFound => 1,
            ErrorCode::GameNotFound => 2,
            ErrorCode::GameFull => 3,
            ErrorCode::AlreadyInGame => 4,
            ErrorCode::NotAPlayer => 5,
            ErrorCode::PhaseMismatch => 6,
            ErrorCode::OutOfTurn => 7,
            ErrorCode::CardNotInHand => 8,
            ErrorCode::IllegalPlay => 9,
            ErrorCode::ParseCard => 10,
            ErrorCode::BadRequest => 11,
            ErrorCode::ConfigError => 12,
            ErrorCode::Internal => 13,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
