//! Legal-play rules and trick resolution for Hearts.

use super::cards_logic::{filter, hand_has_suit};
use super::cards_types::{Card, Suit};
use super::state::Trick;
use crate::domain::errors::DomainError;

/// Whether `card` may be played from `hand` into `trick`.
///
/// The rules, in the order they bind:
/// 1. The very first card of the hand must be the 2 of clubs.
/// 2. On the first trick neither the queen of spades nor any heart may be
///    played, unless the hand leaves no other choice.
/// 3. A heart may only be led once hearts are broken, unless the hand is
///    all hearts.
/// 4. A follower holding the lead suit must follow it.
pub fn is_legal_play(
    card: Card,
    trick: &[Card],
    hand: &[Card],
    first_trick: bool,
    hearts_broken: bool,
) -> bool {
    if first_trick && trick.is_empty() {
        return card == Card::TWO_OF_CLUBS;
    }
    if first_trick {
        if card == Card::QUEEN_OF_SPADES {
            let forced = hand
                .iter()
                .all(|&c| c.suit == Suit::Hearts || c == Card::QUEEN_OF_SPADES);
            if !forced {
                return false;
            }
        } else if card.suit == Suit::Hearts {
            let only_hearts = hand.iter().all(|c| c.suit == Suit::Hearts);
            if !only_hearts {
                return false;
            }
        }
    }
    match trick.first() {
        None => {
            // Leading a later trick.
            card.suit != Suit::Hearts
                || hearts_broken
                || hand.iter().all(|c| c.suit == Suit::Hearts)
        }
        Some(lead) => card.suit == lead.suit || !hand_has_suit(hand, lead.suit),
    }
}

/// The cards in `hand` that `is_legal_play` accepts, in hand order.
pub fn legal_plays(
    hand: &[Card],
    trick: &[Card],
    first_trick: bool,
    hearts_broken: bool,
) -> Vec<Card> {
    filter(hand, |&c| {
        is_legal_play(c, trick, hand, first_trick, hearts_broken)
    })
}

/// Winner of a completed trick: the highest card of the lead suit, and the
/// player who laid it. Off-suit cards can never win.
pub fn resolve_winner(trick: &Trick) -> Result<(Card, String), DomainError> {
    let lead = trick
        .lead_suit()
        .ok_or_else(|| DomainError::Invariant("resolving an empty trick".into()))?;
    let mut best = 0usize;
    for (i, c) in trick.cards.iter().enumerate().skip(1) {
        if c.suit == lead && c.rank > trick.cards[best].rank {
            best = i;
        }
    }
    Ok((trick.cards[best], trick.player_ids[best].clone()))
}
