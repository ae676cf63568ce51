use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::{GuildId, PlayerId};
use crate::eval::DecisionCounts;

/// Ответ, который адаптер должен отправить в чат.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reply {
    /// Кому адресован ответ (упомянутый игрок или автор).
    /// `None` – автор запроса неизвестен (например, реплей из CLI).
    pub target_id: Option<PlayerId>,
    pub text: String,
}

/// DTO одной ситуации в разбивке решений.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreakdownItemDto {
    pub total: u32,
    pub dealer_card: String,
    pub counts: DecisionCounts,
}

/// DTO активной руки (для отладки и CLI).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveHandDto {
    pub player_id: PlayerId,
    pub guild_id: GuildId,
    pub bet_amount: Chips,
    pub initial_cards: Vec<String>,
    pub initial_total: u32,
    pub dealer_card: String,
    pub last_total: u32,
}
