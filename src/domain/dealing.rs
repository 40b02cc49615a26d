//! Deck construction and seeded dealing.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::cards_types::{Card, Rank, Suit};

/// The 52-card deck in canonical order (suits, then ranks within suit).
pub fn make_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card { suit, rank });
        }
    }
    deck
}

/// Shuffle the full deck with the given seed and deal it round-robin into
/// `num_hands` hands. Hand sizes differ by at most one; each hand is sorted.
pub fn deal_hands(num_hands: usize, seed: u64) -> Vec<Vec<Card>> {
    let mut deck = make_deck();
    let mut rng = StdRng::seed_from_u64(seed);
    deck.shuffle(&mut rng);

    let mut hands = vec![Vec::with_capacity(52 / num_hands + 1); num_hands];
    for (i, card) in deck.into_iter().enumerate() {
        hands[i % num_hands].push(card);
    }
    for hand in &mut hands {
        hand.sort();
    }
    hands
}
