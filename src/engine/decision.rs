use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::chips::Chips;
use crate::domain::hand::Decision;

/// `.bj` / `.blackjack`, опционально `all` или ставка числом.
static GAME_COMMAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\.(bj|blackjack)(\s+all|\s+\d+)?").expect("game command regex is valid")
});

/// Словарь текстовых решений игрока. Сравнение по всему сообщению.
const TEXT_DECISIONS: [(&str, Decision); 4] = [
    ("hit", Decision::Hit),
    ("stand", Decision::Stand),
    ("double down", Decision::Double),
    ("double", Decision::Double),
];

/// Вывести решение по разнице между двумя снапшотами.
///
/// Порядок проверок фиксирован: HIT, затем DOUBLE, затем STAND.
/// Добор карты, совпавший с ростом ставки, засчитывается как HIT.
/// Падение суммы без роста ставки не моделируется -> `None`.
pub fn infer_decision(
    last_total: u32,
    bet_amount: Chips,
    new_total: u32,
    new_bet: Chips,
) -> Option<Decision> {
    if new_total > last_total {
        return Some(Decision::Hit);
    }
    if new_bet > bet_amount {
        return Some(Decision::Double);
    }
    if new_total == last_total {
        return Some(Decision::Stand);
    }
    None
}

/// Распознать текстовое решение ("hit", "Stand", "DOUBLE DOWN").
pub fn parse_text_decision(raw: &str) -> Option<Decision> {
    let lowered = raw.trim().to_lowercase();
    TEXT_DECISIONS
        .iter()
        .find(|(word, _)| *word == lowered)
        .map(|(_, d)| *d)
}

/// Является ли текст командой запуска игры у бота-крупье.
pub fn is_game_command(raw: &str) -> bool {
    GAME_COMMAND_RE.is_match(raw)
}
