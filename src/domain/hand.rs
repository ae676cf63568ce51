use core::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::{GuildId, PlayerId};

/// Снимок руки игрока: метки карт в порядке раздачи + сумма очков,
/// как её показал бот.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandSnapshot {
    pub cards: Vec<String>,
    pub total: u32,
}

impl HandSnapshot {
    pub fn new(cards: Vec<String>, total: u32) -> Self {
        Self { cards, total }
    }

    /// Карты через запятую – формат колонки в хранилище.
    pub fn joined_cards(&self) -> String {
        self.cards.join(",")
    }

    pub fn split_cards(joined: &str) -> Vec<String> {
        joined
            .split(',')
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Решение игрока. Никогда не наблюдается напрямую, только выводится.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Hit,
    Stand,
    Double,
}

impl Decision {
    pub const ALL: [Decision; 3] = [Decision::Hit, Decision::Stand, Decision::Double];

    /// Стабильный строковый тег для хранилища.
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Hit => "hit",
            Decision::Stand => "stand",
            Decision::Double => "double",
        }
    }

    /// "Hit", "Stand", "Double" – для текста ответа.
    pub fn title(self) -> &'static str {
        match self {
            Decision::Hit => "Hit",
            Decision::Stand => "Stand",
            Decision::Double => "Double",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hit" => Ok(Decision::Hit),
            "stand" => Ok(Decision::Stand),
            "double" => Ok(Decision::Double),
            other => Err(format!("Unknown decision tag: {other}")),
        }
    }
}

/// Итог раздачи для игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum HandResult {
    Win,
    Lose,
    Tie,
}

impl HandResult {
    pub fn as_str(self) -> &'static str {
        match self {
            HandResult::Win => "win",
            HandResult::Lose => "lose",
            HandResult::Tie => "tie",
        }
    }
}

impl fmt::Display for HandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" => Ok(HandResult::Win),
            "lose" => Ok(HandResult::Lose),
            "tie" => Ok(HandResult::Tie),
            other => Err(format!("Unknown result tag: {other}")),
        }
    }
}

/// Завершённая раздача. Создаётся трекером один раз, дальше только читается.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlackjackRecord {
    pub player_id: PlayerId,
    pub guild_id: GuildId,
    pub bet_amount: Chips,
    pub initial_hand: HandSnapshot,
    pub dealer_card: String,
    pub decision: Decision,
    pub final_hand: HandSnapshot,
    pub result: HandResult,
    pub timestamp: DateTime<Utc>,
}
