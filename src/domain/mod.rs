//! Domain layer: pure card and game logic.

pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod dealing;
pub mod errors;
pub mod game;
pub mod player_view;
pub mod scoring;
pub mod state;
pub mod tricks;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_cards;
#[cfg(test)]
mod tests_game;
#[cfg(test)]
mod tests_scoring;

// Re-exports for ergonomics
pub use cards_parsing::try_parse_cards;
pub use cards_types::{Card, Rank, Suit};
pub use dealing::{deal_hands, make_deck};
pub use errors::DomainError;
pub use game::{CompletedTrick, HeartsGame, PlayOutcome};
pub use player_view::{view, GameStateView, PlayerView};
pub use state::{Phase, PlayerState, Trick, SEATS};
