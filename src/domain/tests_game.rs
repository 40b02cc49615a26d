use super::test_gens::card_lit;
use crate::domain::cards_logic::filter_by_suit;
use crate::domain::{
    make_deck, view, Card, CompletedTrick, DomainError, HeartsGame, Phase, Suit, SEATS,
};

fn table() -> HeartsGame {
    let mut game = HeartsGame::new("g0001");
    for i in 0..SEATS {
        game.add_player(format!("s{i}"), format!("player{i}")).unwrap();
    }
    game
}

/// One suit per seat: s0 holds every club, so s0 leads every trick, takes
/// every trick, and therefore every heart and the queen of spades.
fn suit_hands() -> [Vec<Card>; SEATS] {
    let deck = make_deck();
    [
        filter_by_suit(&deck, &[Suit::Clubs]),
        filter_by_suit(&deck, &[Suit::Diamonds]),
        filter_by_suit(&deck, &[Suit::Spades]),
        filter_by_suit(&deck, &[Suit::Hearts]),
    ]
}

fn started_table() -> HeartsGame {
    let mut game = table();
    game.start_with_hands(suit_hands()).unwrap();
    game
}

/// Play the hand to completion, every seat playing its first legal card.
fn play_out(game: &mut HeartsGame) -> Vec<CompletedTrick> {
    let mut tricks = Vec::new();
    while game.phase() == Phase::Playing {
        let next = game.next_player_id().unwrap().to_string();
        let card = game.legal_plays(&next)[0];
        let outcome = game.play_card(&next, card).unwrap();
        assert!(game.deck_accounted_for(), "card leaked mid-hand");
        if let Some(trick) = outcome.completed_trick {
            tricks.push(trick);
        }
    }
    tricks
}

#[test]
fn lobby_enforces_capacity_and_uniqueness() {
    let mut game = table();
    assert!(!game.accepting_more_players());
    assert!(matches!(
        game.add_player("s9", "latecomer"),
        Err(DomainError::GameFull)
    ));
    let mut partial = HeartsGame::new("g0002");
    partial.add_player("s0", "player0").unwrap();
    assert!(matches!(
        partial.add_player("s0", "player0"),
        Err(DomainError::AlreadyInGame(_))
    ));
    assert!(partial.accepting_more_players());
}

#[test]
fn removing_a_player_reopens_the_seat() {
    let mut game = table();
    game.remove_player("s2").unwrap();
    assert!(game.accepting_more_players());
    assert_eq!(game.player_names(), vec!["player0", "player1", "player3"]);
    // Unknown players are not an error.
    game.remove_player("s9").unwrap();
}

#[test]
fn readiness_tracking() {
    let mut game = table();
    assert_eq!(game.unconfirmed_player_ids().len(), 4);
    game.confirm_ready("s1").unwrap();
    game.confirm_ready("s3").unwrap();
    assert_eq!(game.unconfirmed_player_ids(), vec!["s0", "s2"]);
    assert!(matches!(
        game.confirm_ready("s9"),
        Err(DomainError::PlayerNotFound(_))
    ));
}

#[test]
fn start_requires_a_full_table() {
    let mut game = HeartsGame::new("g0003");
    game.add_player("s0", "player0").unwrap();
    assert!(game.start(1).is_err());
}

#[test]
fn start_rejects_hands_that_do_not_partition_the_deck() {
    let mut game = table();
    let mut hands = suit_hands();
    hands[0][0] = card_lit("Ah"); // duplicates a heart, drops a club
    assert!(matches!(
        game.start_with_hands(hands),
        Err(DomainError::Invariant(_))
    ));
}

#[test]
fn seeded_start_deals_and_hands_the_lead_to_the_two_of_clubs() {
    let mut game = table();
    game.start(99).unwrap();
    assert_eq!(game.phase(), Phase::Playing);
    assert!(game.deck_accounted_for());
    let leader = game.next_player_id().unwrap().to_string();
    assert!(game.hand_of(&leader).unwrap().contains(&Card::TWO_OF_CLUBS));
    assert_eq!(game.legal_plays(&leader), vec![Card::TWO_OF_CLUBS]);
}

#[test]
fn turn_order_and_hand_checks() {
    let mut game = started_table();
    // s0 holds the 2c; nobody else may move first.
    assert!(matches!(
        game.play_card("s1", card_lit("2d")),
        Err(DomainError::OutOfTurn(_))
    ));
    assert!(matches!(
        game.play_card("s0", card_lit("2d")),
        Err(DomainError::CardNotInHand(_))
    ));
    assert!(matches!(
        game.play_card("s0", card_lit("3c")),
        Err(DomainError::IllegalPlay(_))
    ));
    assert!(matches!(
        game.play_card("s9", card_lit("2c")),
        Err(DomainError::PlayerNotFound(_))
    ));
    game.play_card("s0", card_lit("2c")).unwrap();
    assert_eq!(game.next_player_id(), Some("s1"));
}

#[test]
fn trick_winner_collects_and_leads() {
    let mut game = started_table();
    game.play_card("s0", card_lit("2c")).unwrap();
    game.play_card("s1", card_lit("2d")).unwrap();
    game.play_card("s2", card_lit("2s")).unwrap();
    let outcome = game.play_card("s3", card_lit("2h")).unwrap();
    let trick = outcome.completed_trick.unwrap();
    assert_eq!(trick.winner_id, "s0");
    assert_eq!(trick.winning_card, card_lit("2c"));
    assert_eq!(trick.cards.len(), 4);
    assert!(!outcome.hand_complete);
    // Winner leads the next trick.
    assert_eq!(game.next_player_id(), Some("s0"));
    assert_eq!(game.players()[0].trick_score, 1);
    assert!(game.hearts_broken());
}

#[test]
fn full_hand_to_moon_shot() {
    let mut game = started_table();
    let tricks = play_out(&mut game);
    assert_eq!(tricks.len(), 13);
    assert!(tricks.iter().all(|t| t.winner_id == "s0"));
    assert_eq!(game.phase(), Phase::Completed);
    assert!(game.deck_accounted_for());

    let scores: Vec<i32> = game
        .players()
        .iter()
        .map(|p| p.hand_score.unwrap())
        .collect();
    assert_eq!(scores, vec![0, 26, 26, 26], "s0 shot the moon");
    assert_eq!(game.players()[0].trick_score, 26);
    assert_eq!(game.next_player_id(), None);
}

#[test]
fn abort_is_terminal() {
    let mut game = started_table();
    game.abort();
    assert_eq!(game.phase(), Phase::Aborted);
    assert!(matches!(
        game.play_card("s0", card_lit("2c")),
        Err(DomainError::PhaseMismatch(_))
    ));
    assert!(matches!(
        game.remove_player("s0"),
        Err(DomainError::PhaseMismatch(_))
    ));
}

#[test]
fn view_hides_other_hands_while_playing() {
    let game = started_table();
    let snapshot = view(&game, Some("s1"));
    assert_eq!(snapshot.phase, Phase::Playing);
    assert_eq!(snapshot.players.len(), 4);
    for p in &snapshot.players {
        assert_eq!(p.num_cards, 13);
        if p.id == "s1" {
            assert_eq!(p.cards.as_ref().unwrap().len(), 13);
        } else {
            assert!(p.cards.is_none());
        }
        assert!(p.hand_score.is_none());
    }
    // Not on move: no legal plays offered.
    assert!(snapshot.legal_plays.is_empty());
    assert!(snapshot.players[0].is_next);
}

#[test]
fn view_offers_legal_plays_to_the_seat_on_move() {
    let game = started_table();
    let snapshot = view(&game, Some("s0"));
    assert_eq!(snapshot.legal_plays, vec![Card::TWO_OF_CLUBS]);
}

#[test]
fn observer_view_is_all_public() {
    let mut game = started_table();
    game.play_card("s0", card_lit("2c")).unwrap();
    let snapshot = view(&game, None);
    assert!(snapshot.players.iter().all(|p| p.cards.is_none()));
    assert!(snapshot.players.iter().all(|p| p.tricks.is_empty()));
    assert_eq!(snapshot.current_trick, vec![Card::TWO_OF_CLUBS]);
    assert!(snapshot.legal_plays.is_empty());
}

#[test]
fn completed_view_reveals_tricks_and_scores() {
    let mut game = started_table();
    play_out(&mut game);
    let snapshot = view(&game, None);
    assert_eq!(snapshot.phase, Phase::Completed);
    let total: usize = snapshot.players.iter().map(|p| p.num_tricks).sum();
    assert_eq!(total, 13);
    for p in &snapshot.players {
        assert!(p.hand_score.is_some());
        assert_eq!(p.tricks.len(), p.num_tricks);
        assert_eq!(p.num_cards, 0);
    }
}
