//! Справочная базовая стратегия (без сплитов) – для сравнения
//! с тем, что подсказывает накопленная статистика.

use crate::domain::card::{is_soft_total, Card};
use crate::domain::hand::Decision;

fn hard_strategy(total: u32, dealer: u32, can_double: bool) -> Decision {
    let dealer_weak = (2..=6).contains(&dealer);
    match total {
        t if t >= 17 => Decision::Stand,
        13..=16 if dealer_weak => Decision::Stand,
        12 if (4..=6).contains(&dealer) => Decision::Stand,
        11 if can_double => Decision::Double,
        10 if can_double && (2..=9).contains(&dealer) => Decision::Double,
        9 if can_double && (3..=6).contains(&dealer) => Decision::Double,
        _ => Decision::Hit,
    }
}

fn soft_strategy(total: u32, dealer: u32, can_double: bool) -> Decision {
    let double_vs = |lo: u32| can_double && (lo..=6).contains(&dealer);
    match total {
        t if t >= 19 => Decision::Stand,
        18 if double_vs(3) => Decision::Double,
        18 if matches!(dealer, 2 | 7 | 8) => Decision::Stand,
        17 if double_vs(3) => Decision::Double,
        15 | 16 if double_vs(4) => Decision::Double,
        13 | 14 if double_vs(5) => Decision::Double,
        _ => Decision::Hit,
    }
}

/// Базовая стратегия по сумме, очкам открытой карты дилера (туз = 11)
/// и мягкости руки.
pub fn basic_strategy(total: u32, dealer_value: u32, soft: bool, can_double: bool) -> Decision {
    if soft {
        soft_strategy(total, dealer_value, can_double)
    } else {
        hard_strategy(total, dealer_value, can_double)
    }
}

/// Базовая стратегия для стартовой руки из меток карт.
///
/// `None`, если сумма неизвестна или карту дилера не удалось разобрать.
/// Удвоение считается доступным только на двух картах.
pub fn basic_strategy_for(cards: &[String], total: u32, dealer_card: &str) -> Option<Decision> {
    if total == 0 {
        return None;
    }
    let dealer: Card = dealer_card.parse().ok()?;
    let soft = is_soft_total(cards, total);
    let can_double = cards.len() == 2;

    Some(basic_strategy(
        total,
        dealer.rank.blackjack_value(),
        soft,
        can_double,
    ))
}
