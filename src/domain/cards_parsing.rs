//! Card parsing and display for the two-character text form (e.g. "2c", "Qs").

use std::fmt;
use std::str::FromStr;

use super::cards_types::{Card, Rank, Suit};
use crate::domain::errors::DomainError;

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = match self {
            Suit::Clubs => 'c',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
            Suit::Diamonds => 'd',
        };
        write!(f, "{ch}")
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };
        write!(f, "{ch}")
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

fn parse_rank(ch: char) -> Option<Rank> {
    match ch.to_ascii_lowercase() {
        '2' => Some(Rank::Two),
        '3' => Some(Rank::Three),
        '4' => Some(Rank::Four),
        '5' => Some(Rank::Five),
        '6' => Some(Rank::Six),
        '7' => Some(Rank::Seven),
        '8' => Some(Rank::Eight),
        '9' => Some(Rank::Nine),
        't' => Some(Rank::Ten),
        'j' => Some(Rank::Jack),
        'q' => Some(Rank::Queen),
        'k' => Some(Rank::King),
        'a' => Some(Rank::Ace),
        _ => None,
    }
}

fn parse_suit(ch: char) -> Option<Suit> {
    match ch.to_ascii_lowercase() {
        'c' => Some(Suit::Clubs),
        'h' => Some(Suit::Hearts),
        's' => Some(Suit::Spades),
        'd' => Some(Suit::Diamonds),
        _ => None,
    }
}

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(rank_ch), Some(suit_ch), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(DomainError::ParseCard(s.to_string()));
        };
        let rank = parse_rank(rank_ch).ok_or_else(|| DomainError::ParseCard(s.to_string()))?;
        let suit = parse_suit(suit_ch).ok_or_else(|| DomainError::ParseCard(s.to_string()))?;
        Ok(Card { suit, rank })
    }
}

/// Parse a sequence of card tokens, failing on the first invalid one.
pub fn try_parse_cards<I, S>(tokens: I) -> Result<Vec<Card>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<Card>())
        .collect()
}
