use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Масть карты в том виде, в каком её рисует бот-крупье.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Suit {
    Clubs,    // ♣
    Diamonds, // ♦
    Hearts,   // ♥
    Spades,   // ♠
}

impl Suit {
    pub fn glyph(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    pub fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '♣' => Some(Suit::Clubs),
            '♦' => Some(Suit::Diamonds),
            '♥' => Some(Suit::Hearts),
            '♠' => Some(Suit::Spades),
            _ => None,
        }
    }
}

/// Ранг карты.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// Очки карты в блэкджеке. Туз считается за 11,
    /// мягкость руки определяется отдельно.
    pub fn blackjack_value(self) -> u32 {
        match self {
            Rank::Ace => 11,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            r => r as u32,
        }
    }

    pub fn is_ace(self) -> bool {
        matches!(self, Rank::Ace)
    }

    fn parse(s: &str) -> Option<Self> {
        let rank = match s.to_ascii_uppercase().as_str() {
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            _ => return None,
        };
        Some(rank)
    }
}

/// Карта, разобранная из текстовой метки вида `K♠` или `10♦`.
///
/// В записях рук хранятся исходные метки (строки), `Card` нужен
/// только там, где важны очки: мягкая рука, значение открытой карты дилера.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Ten => write!(f, "10"),
            Rank::Jack => write!(f, "J"),
            Rank::Queen => write!(f, "Q"),
            Rank::King => write!(f, "K"),
            Rank::Ace => write!(f, "A"),
            r => write!(f, "{}", *r as u32),
        }
    }
}

impl fmt::Display for Card {
    /// Формат вида `A♥`, `10♦`, `7♣`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit.glyph())
    }
}

/// Парсинг метки вида "A♥", "10♦", "k♠". Масть всегда последний символ.
impl FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let suit_ch = s
            .chars()
            .last()
            .ok_or_else(|| "Card label is empty".to_string())?;
        let suit = Suit::from_glyph(suit_ch).ok_or_else(|| format!("Invalid suit: {suit_ch}"))?;

        let rank_str = &s[..s.len() - suit_ch.len_utf8()];
        let rank = Rank::parse(rank_str).ok_or_else(|| format!("Invalid rank: {rank_str}"))?;

        Ok(Card { rank, suit })
    }
}

/// Мягкая ли рука: есть туз, который сейчас считается за 11.
///
/// Нераспознанные метки пропускаются.
pub fn is_soft_total(labels: &[String], total: u32) -> bool {
    let cards: Vec<Card> = labels.iter().filter_map(|l| l.parse().ok()).collect();
    let aces = cards.iter().filter(|c| c.rank.is_ace()).count() as u32;
    if aces == 0 {
        return false;
    }

    let non_ace: u32 = cards
        .iter()
        .filter(|c| !c.rank.is_ace())
        .map(|c| c.rank.blackjack_value())
        .sum();
    let hard_total = non_ace + aces;

    total <= 21 && total == hard_total + 10
}
