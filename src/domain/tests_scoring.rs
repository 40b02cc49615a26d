use super::test_gens::{card_lit, cards};
use crate::domain::scoring::{card_points, settle_hand, trick_points, HAND_POINTS};
use crate::domain::PlayerState;

#[test]
fn hearts_are_one_point_each() {
    assert_eq!(card_points(card_lit("2h")), 1);
    assert_eq!(card_points(card_lit("Ah")), 1);
}

#[test]
fn queen_of_spades_is_thirteen() {
    assert_eq!(card_points(card_lit("Qs")), 13);
    assert_eq!(card_points(card_lit("Ks")), 0);
    assert_eq!(card_points(card_lit("Qd")), 0);
}

#[test]
fn trick_points_sum_card_points() {
    assert_eq!(trick_points(&cards("2h Qs 5d 9c")), 14);
    assert_eq!(trick_points(&cards("2c 3c 4c 5c")), 0);
}

#[test]
fn whole_deck_is_worth_26() {
    assert_eq!(trick_points(&crate::domain::make_deck()), HAND_POINTS);
}

fn players_with_trick_scores(scores: [i32; 4]) -> Vec<PlayerState> {
    scores
        .iter()
        .enumerate()
        .map(|(i, &score)| {
            let mut p = PlayerState::new(format!("s{i}"), format!("player{i}"));
            p.trick_score = score;
            p
        })
        .collect()
}

#[test]
fn normal_hand_scores_equal_trick_scores() {
    let mut players = players_with_trick_scores([13, 13, 0, 0]);
    settle_hand(&mut players);
    let scores: Vec<i32> = players.iter().map(|p| p.hand_score.unwrap()).collect();
    assert_eq!(scores, vec![13, 13, 0, 0]);
}

#[test]
fn moon_shot_inverts_the_scores() {
    let mut players = players_with_trick_scores([26, 0, 0, 0]);
    settle_hand(&mut players);
    let scores: Vec<i32> = players.iter().map(|p| p.hand_score.unwrap()).collect();
    assert_eq!(scores, vec![0, 26, 26, 26]);
}
