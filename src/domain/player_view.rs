//! Per-requester snapshots of a game.
//!
//! A player sees their own hand and taken tricks; everyone else's hands stay
//! hidden until the game completes, with only counts and scores exposed.
//! Observers see the public fields of every seat.

use serde::{Deserialize, Serialize};

use super::cards_types::Card;
use super::game::HeartsGame;
use super::state::Phase;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateView {
    pub id: String,
    pub phase: Phase,
    pub players: Vec<PlayerView>,
    pub current_trick: Vec<Card>,
    /// Only populated when the requester is the seat on move.
    pub legal_plays: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<Card>>,
    pub num_cards: usize,
    pub tricks: Vec<Vec<Card>>,
    pub num_tricks: usize,
    pub trick_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_score: Option<i32>,
    pub is_next: bool,
}

/// Build the view of `game` as seen by `requester` (a session id, or None
/// for an anonymous observer).
pub fn view(game: &HeartsGame, requester: Option<&str>) -> GameStateView {
    let completed = game.phase() == Phase::Completed;
    let next_player = game.next_player_id().map(str::to_string);

    let players = game
        .players()
        .iter()
        .map(|p| {
            let own_seat = requester == Some(p.id.as_str());
            let revealed = own_seat || completed;
            PlayerView {
                id: p.id.clone(),
                name: p.name.clone(),
                cards: revealed.then(|| p.hand.clone()),
                num_cards: p.hand.len(),
                tricks: if revealed { p.tricks.clone() } else { Vec::new() },
                num_tricks: p.tricks.len(),
                trick_score: p.trick_score,
                hand_score: p.hand_score,
                is_next: next_player.as_deref() == Some(p.id.as_str()),
            }
        })
        .collect();

    let legal_plays = match requester {
        Some(id) => game.legal_plays(id),
        None => Vec::new(),
    };

    GameStateView {
        id: game.id().to_string(),
        phase: game.phase(),
        players,
        current_trick: game.current_trick().cards.clone(),
        legal_plays,
    }
}
