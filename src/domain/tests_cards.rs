use super::test_gens::{card_lit, cards};
use crate::domain::cards_logic::{
    filter_by_suit, filter_ge, filter_le, hand_has_any, hand_has_card, hand_has_suit, highest,
    highest_under_or_lowest, leading_card_of_trick, lowest, remove_card,
};
use crate::domain::{deal_hands, make_deck, try_parse_cards, Card, DomainError, Rank, Suit};

#[test]
fn parses_both_cases() {
    for token in ["2c", "2C"] {
        assert_eq!(token.parse::<Card>().unwrap(), Card::TWO_OF_CLUBS);
    }
    assert_eq!(card_lit("Th"), Card::new(Rank::Ten, Suit::Hearts));
    assert_eq!(card_lit("qS"), Card::QUEEN_OF_SPADES);
    assert_eq!(card_lit("Ad"), Card::new(Rank::Ace, Suit::Diamonds));
}

#[test]
fn rejects_bad_tokens() {
    for token in ["", "2", "10c", "1c", "Zc", "2x", "2c2", " 2c"] {
        assert!(
            matches!(token.parse::<Card>(), Err(DomainError::ParseCard(_))),
            "token {token:?} should fail"
        );
    }
}

#[test]
fn display_roundtrips() {
    for card in make_deck() {
        let text = card.to_string();
        assert_eq!(text.len(), 2);
        assert_eq!(text.parse::<Card>().unwrap(), card);
    }
}

#[test]
fn try_parse_cards_fails_on_first_bad_token() {
    assert_eq!(try_parse_cards(["2c", "Ah"]).unwrap().len(), 2);
    assert!(try_parse_cards(["2c", "nope"]).is_err());
}

#[test]
fn deck_has_52_distinct_cards() {
    let deck = make_deck();
    assert_eq!(deck.len(), 52);
    let mut sorted = deck.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), 52);
}

#[test]
fn ordering_is_suit_then_rank() {
    assert!(card_lit("Ac") < card_lit("2h"));
    assert!(card_lit("2h") < card_lit("2s"));
    assert!(card_lit("Ts") < card_lit("Js"));
    assert!(card_lit("Ks") < card_lit("2d"));
}

#[test]
fn deal_covers_deck_with_even_hands() {
    let hands = deal_hands(4, 7);
    assert_eq!(hands.len(), 4);
    let mut all: Vec<Card> = hands.iter().flatten().copied().collect();
    all.sort();
    assert_eq!(all, make_deck());
    for hand in &hands {
        assert_eq!(hand.len(), 13);
        let mut sorted = hand.clone();
        sorted.sort();
        assert_eq!(&sorted, hand, "hands are dealt sorted");
    }
}

#[test]
fn deal_hand_sizes_differ_by_at_most_one() {
    let hands = deal_hands(3, 11);
    let sizes: Vec<usize> = hands.iter().map(Vec::len).collect();
    assert_eq!(sizes.iter().sum::<usize>(), 52);
    let min = sizes.iter().min().unwrap();
    let max = sizes.iter().max().unwrap();
    assert!(max - min <= 1, "sizes {sizes:?}");
}

#[test]
fn deal_is_seed_deterministic() {
    assert_eq!(deal_hands(4, 42), deal_hands(4, 42));
    assert_ne!(deal_hands(4, 42), deal_hands(4, 43));
}

#[test]
fn hand_membership_helpers() {
    let hand = cards("2c Th Qs");
    assert!(hand_has_suit(&hand, Suit::Hearts));
    assert!(!hand_has_suit(&hand, Suit::Diamonds));
    assert!(hand_has_card(&hand, card_lit("Qs")));
    assert!(!hand_has_card(&hand, card_lit("Ks")));
    assert!(hand_has_any(&hand, &cards("Ad Th")));
    assert!(!hand_has_any(&hand, &cards("Ad Kd")));
}

#[test]
fn remove_card_errors_when_absent() {
    let mut hand = cards("2c Th");
    remove_card(&mut hand, card_lit("Th")).unwrap();
    assert_eq!(hand, cards("2c"));
    assert!(matches!(
        remove_card(&mut hand, card_lit("Th")),
        Err(DomainError::CardNotInHand(_))
    ));
}

#[test]
fn filters_select_expected_cards() {
    let hand = cards("2c 9c Th Qs Kd");
    assert_eq!(filter_by_suit(&hand, &[Suit::Clubs]), cards("2c 9c"));
    assert_eq!(
        filter_by_suit(&hand, &[Suit::Hearts, Suit::Diamonds]),
        cards("Th Kd")
    );
    assert_eq!(filter_le(&hand, Rank::Ten), cards("2c 9c Th"));
    assert_eq!(filter_ge(&hand, Rank::Queen), cards("Qs Kd"));
}

#[test]
fn extremes_compare_by_rank() {
    let hand = cards("9c Th Qs 3d");
    assert_eq!(lowest(&hand).unwrap(), card_lit("3d"));
    assert_eq!(highest(&hand).unwrap(), card_lit("Qs"));
    assert!(matches!(lowest(&[]), Err(DomainError::EmptyCards)));
    assert!(matches!(highest(&[]), Err(DomainError::EmptyCards)));
}

#[test]
fn highest_under_or_lowest_ducks_when_possible() {
    let hand = cards("4c 9c Kc");
    assert_eq!(
        highest_under_or_lowest(&hand, Rank::Ten).unwrap(),
        card_lit("9c")
    );
    // Nothing under the threshold: shed the lowest.
    assert_eq!(
        highest_under_or_lowest(&hand, Rank::Two).unwrap(),
        card_lit("4c")
    );
}

#[test]
fn leading_card_ignores_offsuit() {
    let trick = cards("5h Ad Kh 2s");
    assert_eq!(leading_card_of_trick(&trick).unwrap(), card_lit("Kh"));
    assert!(leading_card_of_trick(&[]).is_err());
}
