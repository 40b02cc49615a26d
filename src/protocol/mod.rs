//! Wire contract shared by the HTTP routes and the websocket streams.

pub mod commands;
pub mod events;

pub use commands::{
    CreateGameResponse, GameAction, GameActionRequest, GameSummary, ListGamesQuery,
    ListGamesResponse, PingRequest, PingResponse, SessionQuery, StatusResponse,
};
pub use events::{GameEvent, GameEventDetail, RegistryEvent};
