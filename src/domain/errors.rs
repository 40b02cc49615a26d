use thiserror::Error;

use super::cards_types::Card;
use super::state::Phase;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("can't parse card '{0}'")]
    ParseCard(String),
    #[error("operation not allowed in the {0} phase")]
    PhaseMismatch(Phase),
    #[error("game already has four players")]
    GameFull,
    #[error("player {0} is already in this game")]
    AlreadyInGame(String),
    #[error("no player {0} in this game")]
    PlayerNotFound(String),
    #[error("it is not player {0}'s turn")]
    OutOfTurn(String),
    #[error("card {0} is not in hand")]
    CardNotInHand(Card),
    #[error("card {0} may not be played into this trick")]
    IllegalPlay(Card),
    #[error("no cards to choose from")]
    EmptyCards,
    #[error("invariant violated: {0}")]
    Invariant(String),
}
