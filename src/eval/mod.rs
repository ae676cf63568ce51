//! Аналитика по сохранённым раздачам: рекомендации и справочная стратегия.

pub mod analyzer;
pub mod basic_strategy;

pub use analyzer::{BlackjackAnalyzer, DecisionCounts, DecisionRates, Recommendation, Situation};
pub use basic_strategy::{basic_strategy, basic_strategy_for};
