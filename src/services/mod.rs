//! Service layer: the single object owning sessions, games, and fan-out.

pub mod game_service;

pub use game_service::GameService;
