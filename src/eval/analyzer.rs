use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::hand::{Decision, HandResult};
use crate::infra::persistence::{DecisionStore, StoreError};

/// Счётчики решений в одной ситуации. Все три решения всегда присутствуют.
pub type DecisionCounts = BTreeMap<Decision, u64>;

/// Ситуация: стартовая сумма игрока + открытая карта дилера.
pub type Situation = (u32, String);

/// Частоты исходов одного решения.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DecisionRates {
    pub decision: Decision,
    pub wins: u64,
    pub losses: u64,
    pub ties: u64,
    pub win_rate: f64,
    pub lose_rate: f64,
    pub tie_rate: f64,
}

impl DecisionRates {
    fn from_counts(decision: Decision, wins: u64, losses: u64, ties: u64) -> Self {
        // Строки берутся из существующих записей, ноль здесь не ожидается.
        let n = (wins + losses + ties).max(1) as f64;
        Self {
            decision,
            wins,
            losses,
            ties,
            win_rate: wins as f64 / n,
            lose_rate: losses as f64 / n,
            tie_rate: ties as f64 / n,
        }
    }

    pub fn sample_size(&self) -> u64 {
        self.wins + self.losses + self.ties
    }
}

/// Рекомендация для ситуации по накопленной истории.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub total: u32,
    pub dealer_card: String,
    /// В порядке первого появления решения в хранилище.
    pub rates: Vec<DecisionRates>,
    pub sample_size: u64,
    pub suggested: Decision,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Recommendation based on {} similar hands:",
            self.sample_size
        )?;
        for r in &self.rates {
            writeln!(
                f,
                "{}: {:.1}% win / {:.1}% lose / {:.1}% tie (n={})",
                r.decision.title(),
                r.win_rate * 100.0,
                r.lose_rate * 100.0,
                r.tie_rate * 100.0,
                r.sample_size()
            )?;
        }
        write!(f, "Suggestion: {}", self.suggested.title())
    }
}

/// Аналитика поверх хранилища решений. Своего состояния не держит.
pub struct BlackjackAnalyzer<'s, S: DecisionStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: DecisionStore + ?Sized> BlackjackAnalyzer<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Разбивка решений по ситуациям для отображения.
    /// Отсутствующие решения присутствуют с нулём.
    pub fn aggregate_decisions(&self) -> Result<BTreeMap<Situation, DecisionCounts>, StoreError> {
        let mut out: BTreeMap<Situation, DecisionCounts> = BTreeMap::new();
        for row in self.store.breakdown()? {
            let counts = out
                .entry((row.initial_total, row.dealer_card))
                .or_insert_with(|| Decision::ALL.iter().map(|d| (*d, 0)).collect());
            counts.insert(row.decision, row.count);
        }
        Ok(out)
    }

    /// Рекомендация для (сумма, карта дилера) или `None`, если данных нет.
    ///
    /// Побеждает решение со строго наибольшей долей побед;
    /// при равенстве – то, что раньше появилось в хранилище.
    pub fn recommendation(
        &self,
        total: u32,
        dealer_card: &str,
    ) -> Result<Option<Recommendation>, StoreError> {
        let rows = self.store.outcomes(total, dealer_card)?;
        if rows.is_empty() {
            return Ok(None);
        }

        // (decision, [win, lose, tie]) в порядке первого появления.
        let mut summary: Vec<(Decision, [u64; 3])> = Vec::new();
        for row in &rows {
            let idx = match summary.iter().position(|(d, _)| *d == row.decision) {
                Some(idx) => idx,
                None => {
                    summary.push((row.decision, [0; 3]));
                    summary.len() - 1
                }
            };
            let slot = match row.result {
                HandResult::Win => 0,
                HandResult::Lose => 1,
                HandResult::Tie => 2,
            };
            summary[idx].1[slot] += row.count;
        }

        let rates: Vec<DecisionRates> = summary
            .into_iter()
            .map(|(d, [w, l, t])| DecisionRates::from_counts(d, w, l, t))
            .collect();

        let mut best = rates[0].decision;
        let mut best_rate = -1.0;
        for r in &rates {
            if r.win_rate > best_rate {
                best = r.decision;
                best_rate = r.win_rate;
            }
        }

        let sample_size = rates.iter().map(DecisionRates::sample_size).sum();

        Ok(Some(Recommendation {
            total,
            dealer_card: dealer_card.to_string(),
            rates,
            sample_size,
            suggested: best,
        }))
    }

    /// Компактный отчёт: строка на ситуацию, либо заглушка без данных.
    pub fn breakdown_report(&self) -> Result<String, StoreError> {
        let breakdown = self.aggregate_decisions()?;
        if breakdown.is_empty() {
            return Ok("No data recorded yet.".to_string());
        }

        let lines: Vec<String> = breakdown
            .iter()
            .map(|((total, dealer), counts)| {
                let decisions = counts
                    .iter()
                    .map(|(d, n)| format!("{d}:{n}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Total {total} vs {dealer}: {decisions}")
            })
            .collect();

        Ok(lines.join("\n"))
    }
}
