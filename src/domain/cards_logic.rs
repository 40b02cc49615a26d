//! Hand predicates and selectors used by the rules engine and play helpers.

use super::cards_types::{Card, Rank, Suit};
use crate::domain::errors::DomainError;

pub fn hand_has_suit(hand: &[Card], suit: Suit) -> bool {
    hand.iter().any(|c| c.suit == suit)
}

pub fn hand_has_card(hand: &[Card], card: Card) -> bool {
    hand.contains(&card)
}

pub fn hand_has_any(hand: &[Card], cards: &[Card]) -> bool {
    cards.iter().any(|c| hand.contains(c))
}

/// Remove one occurrence of `card` from `hand`.
pub fn remove_card(hand: &mut Vec<Card>, card: Card) -> Result<(), DomainError> {
    let pos = hand
        .iter()
        .position(|&c| c == card)
        .ok_or(DomainError::CardNotInHand(card))?;
    hand.remove(pos);
    Ok(())
}

pub fn filter(hand: &[Card], keep: impl Fn(&Card) -> bool) -> Vec<Card> {
    hand.iter().copied().filter(keep).collect()
}

pub fn filter_by_suit(hand: &[Card], suits: &[Suit]) -> Vec<Card> {
    filter(hand, |c| suits.contains(&c.suit))
}

pub fn filter_le(hand: &[Card], rank: Rank) -> Vec<Card> {
    filter(hand, |c| c.rank <= rank)
}

pub fn filter_ge(hand: &[Card], rank: Rank) -> Vec<Card> {
    filter(hand, |c| c.rank >= rank)
}

/// Lowest card by rank. Suits are not compared; ties go to the first card.
pub fn lowest(hand: &[Card]) -> Result<Card, DomainError> {
    hand.iter()
        .copied()
        .reduce(|best, c| if c.rank < best.rank { c } else { best })
        .ok_or(DomainError::EmptyCards)
}

/// Highest card by rank. Suits are not compared; ties go to the first card.
pub fn highest(hand: &[Card]) -> Result<Card, DomainError> {
    hand.iter()
        .copied()
        .reduce(|best, c| if c.rank > best.rank { c } else { best })
        .ok_or(DomainError::EmptyCards)
}

/// Best card strictly under `rank` if one exists, otherwise the lowest card.
/// Used to duck under a threat when possible, or shed the safest card left.
pub fn highest_under_or_lowest(hand: &[Card], rank: Rank) -> Result<Card, DomainError> {
    let under = filter(hand, |c| c.rank < rank);
    if under.is_empty() {
        lowest(hand)
    } else {
        highest(&under)
    }
}

/// Card currently winning a trick: the highest card of the lead suit.
pub fn leading_card_of_trick(trick: &[Card]) -> Result<Card, DomainError> {
    let lead = trick.first().ok_or(DomainError::EmptyCards)?.suit;
    highest(&filter_by_suit(trick, &[lead]))
}
