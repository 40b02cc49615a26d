//! Game phase, per-seat state, and the current trick container.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::cards_types::{Card, Suit};
use crate::domain::errors::DomainError;

pub const SEATS: usize = 4;

/// Overall game progression phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Players are joining and confirming readiness.
    Preparing,
    /// The hand is being played out.
    Playing,
    /// All thirteen tricks are done; hand scores are settled.
    Completed,
    /// The game was torn down before completing.
    Aborted,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Aborted)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Preparing => "preparing",
            Phase::Playing => "playing",
            Phase::Completed => "completed",
            Phase::Aborted => "aborted",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Phase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preparing" => Ok(Phase::Preparing),
            "playing" => Ok(Phase::Playing),
            "completed" => Ok(Phase::Completed),
            "aborted" => Ok(Phase::Aborted),
            _ => Err(DomainError::Invariant(format!("unknown phase '{s}'"))),
        }
    }
}

/// One seat at the table. The id is the owning session's id; the slot does
/// not own the session.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub id: String,
    pub name: String,
    pub ready_to_start: bool,
    pub hand: Vec<Card>,
    pub tricks: Vec<Vec<Card>>,
    pub trick_score: i32,
    /// Settled only once the hand completes.
    pub hand_score: Option<i32>,
}

impl PlayerState {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ready_to_start: false,
            hand: Vec::new(),
            tricks: Vec::new(),
            trick_score: 0,
            hand_score: None,
        }
    }
}

/// Cards played into the trick so far, paired with who laid each.
#[derive(Debug, Clone, Default)]
pub struct Trick {
    pub cards: Vec<Card>,
    pub player_ids: Vec<String>,
}

impl Trick {
    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn add(&mut self, card: Card, player_id: impl Into<String>) {
        self.cards.push(card);
        self.player_ids.push(player_id.into());
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.cards.first().map(|c| c.suit)
    }
}
