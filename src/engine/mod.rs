//! Ядро: восстановление решений игрока по снапшотам стола.
//!
//! Высокоуровневый объект: `HandTracker`
//! Основные операции:
//!   - `extract_observation` – снапшот -> нормализованное наблюдение
//!   - `HandTracker::on_snapshot` – обновить / завершить руку игрока
//!   - `HandTracker::on_text_decision` – текстовое решение как подтверждение
//!   - `is_game_command` – распознать команду запуска игры

pub mod decision;
pub mod extractor;
pub mod tracker;

pub use decision::{infer_decision, is_game_command, parse_text_decision};
pub use extractor::{extract_observation, EmbedField, EmbedSnapshot, Observation};
pub use tracker::{ActiveHand, HandTracker, SnapshotOutcome};
