// Proptest generators and small parsing helpers for domain tests.

use proptest::prelude::*;

use crate::domain::{make_deck, try_parse_cards, Card, Rank, Suit};

/// Parse a whitespace-separated card list, panicking on bad input.
pub fn cards(tokens: &str) -> Vec<Card> {
    try_parse_cards(tokens.split_whitespace()).expect("bad card literal in test")
}

pub fn card_lit(token: &str) -> Card {
    token.parse().expect("bad card literal in test")
}

pub fn suit() -> impl Strategy<Value = Suit> {
    prop_oneof![
        Just(Suit::Clubs),
        Just(Suit::Hearts),
        Just(Suit::Spades),
        Just(Suit::Diamonds),
    ]
}

pub fn rank() -> impl Strategy<Value = Rank> {
    proptest::sample::select(&Rank::ALL[..])
}

pub fn card() -> impl Strategy<Value = Card> {
    (suit(), rank()).prop_map(|(suit, rank)| Card { suit, rank })
}

/// A vector of `count` unique cards, drawn from a shuffled deck.
pub fn unique_cards(count: usize) -> impl Strategy<Value = Vec<Card>> {
    Just(make_deck()).prop_shuffle().prop_map(move |mut deck| {
        deck.truncate(count);
        deck
    })
}

pub fn unique_cards_up_to(max_count: usize) -> impl Strategy<Value = Vec<Card>> {
    (1..=max_count).prop_flat_map(unique_cards)
}

/// A hand of 1 to 13 unique cards.
pub fn hand() -> impl Strategy<Value = Vec<Card>> {
    unique_cards_up_to(13)
}

/// A hand with no cards of the given suit.
pub fn hand_without_suit(excluded: Suit) -> impl Strategy<Value = Vec<Card>> {
    let pool: Vec<Card> = make_deck()
        .into_iter()
        .filter(|c| c.suit != excluded)
        .collect();
    (1usize..=13).prop_flat_map(move |n| {
        Just(pool.clone()).prop_shuffle().prop_map(move |mut hand| {
            hand.truncate(n);
            hand
        })
    })
}
