use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;
use crate::engine::ActiveHand;
use crate::eval::{DecisionCounts, Recommendation, Situation};

use super::dto::{ActiveHandDto, BreakdownItemDto};

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum Query {
    /// Текстовый отчёт по всем ситуациям.
    Stats,

    /// Разбивка решений по ситуациям (структурой).
    Breakdown,

    /// Рекомендация для ситуации.
    Recommendation { total: u32, dealer_card: String },

    /// Текущая незавершённая рука игрока.
    ActiveHand { player_id: PlayerId },
}

/// Результат запроса "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum QueryResponse {
    Report(String),
    Breakdown(Vec<BreakdownItemDto>),
    Recommendation(Option<Recommendation>),
    ActiveHand(Option<ActiveHandDto>),
}

/// Собрать DTO активной руки.
pub fn build_active_hand_view(hand: &ActiveHand) -> ActiveHandDto {
    ActiveHandDto {
        player_id: hand.player_id,
        guild_id: hand.guild_id,
        bet_amount: hand.bet_amount,
        initial_cards: hand.initial_hand.cards.clone(),
        initial_total: hand.initial_hand.total,
        dealer_card: hand.dealer_card.clone(),
        last_total: hand.last_total,
    }
}

/// Развернуть агрегат анализатора в список DTO (порядок ситуаций сохраняется).
pub fn build_breakdown_view(breakdown: BTreeMap<Situation, DecisionCounts>) -> Vec<BreakdownItemDto> {
    breakdown
        .into_iter()
        .map(|((total, dealer_card), counts)| BreakdownItemDto {
            total,
            dealer_card,
            counts,
        })
        .collect()
}
