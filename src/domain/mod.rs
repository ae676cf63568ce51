//! Доменная модель: карты, ставки, снимки рук, решения и итоговые записи.

pub mod card;
pub mod chips;
pub mod hand;

// Идентификаторы платформы (снежинки Discord укладываются в u64).
pub type PlayerId = u64;
pub type GuildId = u64;

pub use card::*;
pub use chips::*;
pub use hand::*;
