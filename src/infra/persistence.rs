use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::hand::{BlackjackRecord, Decision, HandResult};

/// Ошибки хранилища решений.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Ошибка SQLite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Не удалось подготовить каталог базы {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Повреждённая строка в хранилище: {0}")]
    Corrupt(String),
}

/// Сколько раз в ситуации (сумма, карта дилера) было принято решение.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreakdownRow {
    pub initial_total: u32,
    pub dealer_card: String,
    pub decision: Decision,
    pub count: u64,
}

/// Исходы одного решения в конкретной ситуации.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutcomeRow {
    pub decision: Decision,
    pub result: HandResult,
    pub count: u64,
}

/// Полная разбивка: ситуация x решение x итог.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsRow {
    pub initial_total: u32,
    pub dealer_card: String,
    pub decision: Decision,
    pub result: HandResult,
    pub count: u64,
}

/// Хранилище завершённых раздач: только дописывание и агрегаты.
///
/// Реализации:
/// - `InMemoryDecisionStore` – тесты и «сухой» прогон реплея;
/// - `SqliteDecisionStore` – боевое хранилище на диске.
pub trait DecisionStore {
    /// Сохранить одну запись.
    fn save(&mut self, record: &BlackjackRecord) -> Result<(), StoreError>;

    /// Счётчики по (initial_total, dealer_card, decision),
    /// по возрастанию суммы, затем карты дилера, затем тега решения.
    fn breakdown(&self) -> Result<Vec<BreakdownRow>, StoreError>;

    /// Счётчики (decision, result) для точной ситуации.
    /// Порядок строк – порядок первого появления пары в хранилище.
    fn outcomes(&self, total: u32, dealer_card: &str) -> Result<Vec<OutcomeRow>, StoreError>;

    /// Счётчики по (initial_total, dealer_card, decision, result).
    fn stats(&self) -> Result<Vec<StatsRow>, StoreError>;

    /// Все записи в порядке сохранения.
    fn records(&self) -> Result<Vec<BlackjackRecord>, StoreError>;
}

/// Простая in-memory реализация для тестов и локального запуска.
#[derive(Debug, Default)]
pub struct InMemoryDecisionStore {
    records: Vec<BlackjackRecord>,
}

impl InMemoryDecisionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DecisionStore for InMemoryDecisionStore {
    fn save(&mut self, record: &BlackjackRecord) -> Result<(), StoreError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn breakdown(&self) -> Result<Vec<BreakdownRow>, StoreError> {
        let mut groups: BTreeMap<(u32, String, &'static str), (Decision, u64)> = BTreeMap::new();
        for r in &self.records {
            let key = (r.initial_hand.total, r.dealer_card.clone(), r.decision.as_str());
            groups.entry(key).or_insert((r.decision, 0)).1 += 1;
        }

        Ok(groups
            .into_iter()
            .map(|((initial_total, dealer_card, _), (decision, count))| BreakdownRow {
                initial_total,
                dealer_card,
                decision,
                count,
            })
            .collect())
    }

    fn outcomes(&self, total: u32, dealer_card: &str) -> Result<Vec<OutcomeRow>, StoreError> {
        let mut rows: Vec<OutcomeRow> = Vec::new();
        let matching = self
            .records
            .iter()
            .filter(|r| r.initial_hand.total == total && r.dealer_card == dealer_card);

        for r in matching {
            match rows
                .iter_mut()
                .find(|row| row.decision == r.decision && row.result == r.result)
            {
                Some(row) => row.count += 1,
                None => rows.push(OutcomeRow {
                    decision: r.decision,
                    result: r.result,
                    count: 1,
                }),
            }
        }

        Ok(rows)
    }

    fn stats(&self) -> Result<Vec<StatsRow>, StoreError> {
        type Key = (u32, String, &'static str, &'static str);
        let mut groups: BTreeMap<Key, (Decision, HandResult, u64)> = BTreeMap::new();
        for r in &self.records {
            let key = (
                r.initial_hand.total,
                r.dealer_card.clone(),
                r.decision.as_str(),
                r.result.as_str(),
            );
            groups.entry(key).or_insert((r.decision, r.result, 0)).2 += 1;
        }

        Ok(groups
            .into_iter()
            .map(|((initial_total, dealer_card, _, _), (decision, result, count))| StatsRow {
                initial_total,
                dealer_card,
                decision,
                result,
                count,
            })
            .collect())
    }

    fn records(&self) -> Result<Vec<BlackjackRecord>, StoreError> {
        Ok(self.records.clone())
    }
}
