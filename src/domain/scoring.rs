//! Penalty points and end-of-hand settlement.

use super::cards_types::{Card, Suit};
use super::state::PlayerState;

/// Total penalty points in one hand: thirteen hearts plus the queen of spades.
pub const HAND_POINTS: i32 = 26;

pub fn card_points(c: Card) -> i32 {
    if c.suit == Suit::Hearts {
        1
    } else if c == Card::QUEEN_OF_SPADES {
        13
    } else {
        0
    }
}

pub fn trick_points(cards: &[Card]) -> i32 {
    cards.iter().map(|&c| card_points(c)).sum()
}

/// Settle hand scores once every trick has been taken.
///
/// If one player took every penalty point they shot the moon: they score 0
/// and everyone else scores the full 26. Otherwise each player's hand score
/// is their trick score.
pub fn settle_hand(players: &mut [PlayerState]) {
    let moon_shot = players.iter().any(|p| p.trick_score == HAND_POINTS);
    for p in players {
        let score = if moon_shot {
            HAND_POINTS - p.trick_score
        } else {
            p.trick_score
        };
        p.hand_score = Some(score);
    }
}
