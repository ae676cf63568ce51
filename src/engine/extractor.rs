//! Разбор снапшота стола (embed от бота-крупье) в нормализованное наблюдение.
//!
//! Разбор терпимый: если под-шаблон не совпал, поле остаётся
//! по умолчанию (0 / пусто), а не роняет весь снапшот.
//! Снапшот без карт игрока считается невалидным.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::{HandResult, HandSnapshot};

static CARD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[akqj0-9]{1,2}[♠♣♥♦]").expect("card regex is valid"));

static TOTAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)total:\s*(\d+)").expect("total regex is valid"));

/// Ключевые слова в названии поля, по которым поле считается итогом раздачи.
const RESULT_FIELD_KEYWORDS: [&str; 6] = ["win", "lose", "bust", "tie", "result", "outcome"];

/// Одно именованное текстовое поле снапшота.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Непрозрачный снапшот стола: заголовок + поля в исходном порядке.
/// Адаптер транспорта приводит объекты платформы к этому виду.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmbedSnapshot {
    pub title: String,
    pub fields: Vec<EmbedField>,
}

impl EmbedSnapshot {
    pub fn new(title: impl Into<String>, fields: Vec<EmbedField>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }

    /// Удобный конструктор из пар (name, value).
    pub fn from_pairs(title: impl Into<String>, pairs: &[(&str, &str)]) -> Self {
        Self::new(
            title,
            pairs.iter().map(|(n, v)| EmbedField::new(*n, *v)).collect(),
        )
    }
}

/// Нормализованное наблюдение за рукой игрока.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Observation {
    pub bet_amount: Chips,
    pub player_cards: Vec<String>,
    pub player_total: u32,
    pub dealer_card: String,
    /// `Some` только в финальном снапшоте.
    pub result: Option<HandResult>,
}

impl Observation {
    pub fn hand(&self) -> HandSnapshot {
        HandSnapshot::new(self.player_cards.clone(), self.player_total)
    }

    pub fn is_terminal(&self) -> bool {
        self.result.is_some()
    }
}

/// Классификация поля по его названию. Порядок проверок фиксирован.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldKind {
    Bet,
    Player,
    Dealer,
    Result,
    Other,
}

fn classify_field(name: &str) -> FieldKind {
    let name = name.to_lowercase();
    if name.contains("bet") {
        FieldKind::Bet
    } else if name.contains("your hand") || name.contains("player") {
        FieldKind::Player
    } else if name.contains("dealer") {
        FieldKind::Dealer
    } else if RESULT_FIELD_KEYWORDS.iter().any(|k| name.contains(k)) {
        FieldKind::Result
    } else {
        FieldKind::Other
    }
}

/// Все метки карт в тексте, в порядке появления.
pub fn extract_cards(text: &str) -> Vec<String> {
    CARD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn extract_total(text: &str) -> Option<u32> {
    TOTAL_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Итог по тексту поля. Первое совпавшее ключевое слово выигрывает.
pub fn parse_result(text: &str) -> Option<HandResult> {
    let lowered = text.to_lowercase();
    if lowered.contains("win") {
        Some(HandResult::Win)
    } else if lowered.contains("lose") || lowered.contains("bust") {
        Some(HandResult::Lose)
    } else if lowered.contains("tie") || lowered.contains("push") {
        Some(HandResult::Tie)
    } else {
        None
    }
}

/// Разобрать снапшот.
///
/// `None`, если заголовок не про блэкджек или карты игрока не найдены.
/// Поля обходятся все; если итог встречается в нескольких полях,
/// побеждает последнее распознанное.
pub fn extract_observation(snapshot: &EmbedSnapshot) -> Option<Observation> {
    if !snapshot.title.to_lowercase().contains("blackjack") {
        return None;
    }

    let mut obs = Observation::default();

    for field in &snapshot.fields {
        let value = field.value.as_str();
        match classify_field(&field.name) {
            FieldKind::Bet => {
                obs.bet_amount = Chips::from_digits(value);
            }
            FieldKind::Player => {
                obs.player_cards = extract_cards(value);
                if let Some(total) = extract_total(value) {
                    obs.player_total = total;
                }
            }
            FieldKind::Dealer => {
                if let Some(m) = CARD_RE.find(value) {
                    obs.dealer_card = m.as_str().to_string();
                }
            }
            FieldKind::Result => {
                if let Some(result) = parse_result(value) {
                    obs.result = Some(result);
                }
            }
            FieldKind::Other => {}
        }
    }

    if obs.player_cards.is_empty() {
        return None;
    }

    Some(obs)
}

