//! The Hearts game state machine.
//!
//! `HeartsGame` is a pure data object: methods mutate the state or return an
//! error, and report what happened through their return values. It does no
//! I/O and never looks at the clock, which keeps every rule testable in
//! isolation; event fan-out and timers live in the service layer.

use super::cards_logic::remove_card;
use super::cards_types::{Card, Suit};
use super::dealing::{deal_hands, make_deck};
use super::scoring::{settle_hand, trick_points};
use super::state::{Phase, PlayerState, Trick, SEATS};
use super::tricks::{is_legal_play, legal_plays, resolve_winner};
use crate::domain::errors::DomainError;

#[derive(Debug, Clone)]
pub struct HeartsGame {
    id: String,
    phase: Phase,
    /// Seats in join order; at most four.
    players: Vec<PlayerState>,
    current_trick: Trick,
    tricks_played: u8,
    hearts_broken: bool,
    next_seat: usize,
}

/// What a successful play did, for the caller to report.
#[derive(Debug, Clone, Default)]
pub struct PlayOutcome {
    pub completed_trick: Option<CompletedTrick>,
    pub hand_complete: bool,
}

#[derive(Debug, Clone)]
pub struct CompletedTrick {
    pub cards: Vec<Card>,
    pub winning_card: Card,
    pub winner_id: String,
    pub winner_name: String,
}

impl HeartsGame {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            phase: Phase::Preparing,
            players: Vec::with_capacity(SEATS),
            current_trick: Trick::default(),
            tricks_played: 0,
            hearts_broken: false,
            next_seat: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn player_names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn hearts_broken(&self) -> bool {
        self.hearts_broken
    }

    pub fn contains_player(&self, player_id: &str) -> bool {
        self.seat_of(player_id).is_some()
    }

    fn seat_of(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn accepting_more_players(&self) -> bool {
        self.phase == Phase::Preparing && self.players.len() < SEATS
    }

    pub fn has_full_table(&self) -> bool {
        self.players.len() == SEATS
    }

    pub fn add_player(
        &mut self,
        player_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<(), DomainError> {
        if self.phase != Phase::Preparing {
            return Err(DomainError::PhaseMismatch(self.phase));
        }
        let player_id = player_id.into();
        if self.contains_player(&player_id) {
            return Err(DomainError::AlreadyInGame(player_id));
        }
        if self.players.len() >= SEATS {
            return Err(DomainError::GameFull);
        }
        self.players.push(PlayerState::new(player_id, name));
        Ok(())
    }

    /// Remove a player if seated. Absent players are not an error; removing
    /// from a game past Preparing is.
    pub fn remove_player(&mut self, player_id: &str) -> Result<(), DomainError> {
        let Some(seat) = self.seat_of(player_id) else {
            return Ok(());
        };
        if self.phase != Phase::Preparing {
            return Err(DomainError::PhaseMismatch(self.phase));
        }
        self.players.remove(seat);
        Ok(())
    }

    pub fn confirm_ready(&mut self, player_id: &str) -> Result<(), DomainError> {
        if self.phase != Phase::Preparing {
            return Err(DomainError::PhaseMismatch(self.phase));
        }
        let seat = self
            .seat_of(player_id)
            .ok_or_else(|| DomainError::PlayerNotFound(player_id.to_string()))?;
        self.players[seat].ready_to_start = true;
        Ok(())
    }

    pub fn unconfirmed_player_ids(&self) -> Vec<String> {
        self.players
            .iter()
            .filter(|p| !p.ready_to_start)
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn abort(&mut self) {
        self.phase = Phase::Aborted;
    }

    /// Deal with the given seed and begin play.
    pub fn start(&mut self, seed: u64) -> Result<(), DomainError> {
        let mut hands = deal_hands(SEATS, seed);
        // deal_hands returns exactly SEATS hands; keep the order stable.
        let hands: [Vec<Card>; SEATS] = [
            std::mem::take(&mut hands[0]),
            std::mem::take(&mut hands[1]),
            std::mem::take(&mut hands[2]),
            std::mem::take(&mut hands[3]),
        ];
        self.start_with_hands(hands)
    }

    /// Begin play with pre-dealt hands. The hands must partition the deck;
    /// the seat holding the 2 of clubs leads.
    pub fn start_with_hands(&mut self, hands: [Vec<Card>; SEATS]) -> Result<(), DomainError> {
        if self.phase != Phase::Preparing {
            return Err(DomainError::PhaseMismatch(self.phase));
        }
        if !self.has_full_table() {
            return Err(DomainError::Invariant(format!(
                "starting with {} players",
                self.players.len()
            )));
        }
        let mut all: Vec<Card> = hands.iter().flatten().copied().collect();
        all.sort();
        if all != make_deck() {
            return Err(DomainError::Invariant(
                "dealt hands do not partition the deck".into(),
            ));
        }
        for (seat, hand) in hands.into_iter().enumerate() {
            self.players[seat].hand = hand;
        }
        self.next_seat = self
            .players
            .iter()
            .position(|p| p.hand.contains(&Card::TWO_OF_CLUBS))
            .ok_or_else(|| DomainError::Invariant("no seat holds the 2 of clubs".into()))?;
        self.tricks_played = 0;
        self.hearts_broken = false;
        self.current_trick = Trick::default();
        self.phase = Phase::Playing;
        Ok(())
    }

    /// The seat on move, while the hand is being played.
    pub fn next_player_id(&self) -> Option<&str> {
        if self.phase != Phase::Playing {
            return None;
        }
        self.players.get(self.next_seat).map(|p| p.id.as_str())
    }

    fn is_first_trick(&self) -> bool {
        self.tricks_played == 0
    }

    /// Legal plays for `player_id`: empty unless it is their turn.
    pub fn legal_plays(&self, player_id: &str) -> Vec<Card> {
        if self.next_player_id() != Some(player_id) {
            return Vec::new();
        }
        let Some(seat) = self.seat_of(player_id) else {
            return Vec::new();
        };
        legal_plays(
            &self.players[seat].hand,
            &self.current_trick.cards,
            self.is_first_trick(),
            self.hearts_broken,
        )
    }

    pub fn hand_of(&self, player_id: &str) -> Option<&[Card]> {
        self.seat_of(player_id)
            .map(|seat| self.players[seat].hand.as_slice())
    }

    /// Play a card for `player_id`, enforcing turn order and legality.
    pub fn play_card(&mut self, player_id: &str, card: Card) -> Result<PlayOutcome, DomainError> {
        if self.phase != Phase::Playing {
            return Err(DomainError::PhaseMismatch(self.phase));
        }
        let seat = self
            .seat_of(player_id)
            .ok_or_else(|| DomainError::PlayerNotFound(player_id.to_string()))?;
        if seat != self.next_seat {
            return Err(DomainError::OutOfTurn(player_id.to_string()));
        }
        if !self.players[seat].hand.contains(&card) {
            return Err(DomainError::CardNotInHand(card));
        }
        if !is_legal_play(
            card,
            &self.current_trick.cards,
            &self.players[seat].hand,
            self.is_first_trick(),
            self.hearts_broken,
        ) {
            return Err(DomainError::IllegalPlay(card));
        }

        if card.suit == Suit::Hearts {
            self.hearts_broken = true;
        }
        remove_card(&mut self.players[seat].hand, card)?;
        self.current_trick.add(card, player_id);

        if self.current_trick.size() < SEATS {
            self.next_seat = (self.next_seat + 1) % SEATS;
            return Ok(PlayOutcome::default());
        }
        self.resolve_trick()
    }

    fn resolve_trick(&mut self) -> Result<PlayOutcome, DomainError> {
        let trick = std::mem::take(&mut self.current_trick);
        let (winning_card, winner_id) = resolve_winner(&trick)?;
        let winner_seat = self
            .seat_of(&winner_id)
            .ok_or_else(|| DomainError::Invariant(format!("trick winner {winner_id} unseated")))?;

        let winner = &mut self.players[winner_seat];
        winner.trick_score += trick_points(&trick.cards);
        winner.tricks.push(trick.cards.clone());
        let winner_name = winner.name.clone();

        self.tricks_played += 1;
        self.next_seat = winner_seat;

        let hand_complete = self.players[winner_seat].hand.is_empty();
        if hand_complete {
            self.phase = Phase::Completed;
            settle_hand(&mut self.players);
        }

        Ok(PlayOutcome {
            completed_trick: Some(CompletedTrick {
                cards: trick.cards,
                winning_card,
                winner_id,
                winner_name,
            }),
            hand_complete,
        })
    }

    /// True while every card is accounted for across hands, the current
    /// trick, and taken tricks. Meaningful in Playing and Completed.
    pub fn deck_accounted_for(&self) -> bool {
        let mut all: Vec<Card> = self
            .players
            .iter()
            .flat_map(|p| {
                p.hand
                    .iter()
                    .copied()
                    .chain(p.tricks.iter().flatten().copied())
            })
            .chain(self.current_trick.cards.iter().copied())
            .collect();
        all.sort();
        all == make_deck()
    }
}
