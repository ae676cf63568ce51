//! SQLite-хранилище завершённых раздач.
//!
//! Одна строка на раздачу, карты через запятую, решение и итог –
//! строковыми тегами, время – RFC 3339.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use crate::domain::chips::Chips;
use crate::domain::hand::{BlackjackRecord, Decision, HandResult, HandSnapshot};
use crate::infra::persistence::{BreakdownRow, DecisionStore, OutcomeRow, StatsRow, StoreError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS blackjack_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id INTEGER NOT NULL,
    guild_id INTEGER NOT NULL,
    bet_amount INTEGER NOT NULL,
    initial_cards TEXT NOT NULL,
    initial_total INTEGER NOT NULL,
    dealer_card TEXT NOT NULL,
    decision TEXT NOT NULL,
    final_cards TEXT NOT NULL,
    final_total INTEGER NOT NULL,
    result TEXT NOT NULL,
    timestamp TEXT NOT NULL
)";

/// Хранилище решений поверх одного соединения SQLite.
#[derive(Debug)]
pub struct SqliteDecisionStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteDecisionStore {
    /// Открыть (или создать) базу на диске. Каталоги создаются при необходимости.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        info!(path = %path.display(), "хранилище решений открыто");

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Временная база в памяти (тесты).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute(SCHEMA, ())?;
        Ok(())
    }
}

fn parse_decision(tag: &str) -> Result<Decision, StoreError> {
    tag.parse().map_err(StoreError::Corrupt)
}

fn parse_result(tag: &str) -> Result<HandResult, StoreError> {
    tag.parse().map_err(StoreError::Corrupt)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp {raw:?}: {e}")))
}

/// Сырые колонки одной записи до разбора тегов.
struct RawRecord {
    player_id: i64,
    guild_id: i64,
    bet_amount: i64,
    initial_cards: String,
    initial_total: i64,
    dealer_card: String,
    decision: String,
    final_cards: String,
    final_total: i64,
    result: String,
    timestamp: String,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            player_id: row.get(0)?,
            guild_id: row.get(1)?,
            bet_amount: row.get(2)?,
            initial_cards: row.get(3)?,
            initial_total: row.get(4)?,
            dealer_card: row.get(5)?,
            decision: row.get(6)?,
            final_cards: row.get(7)?,
            final_total: row.get(8)?,
            result: row.get(9)?,
            timestamp: row.get(10)?,
        })
    }

    fn into_record(self) -> Result<BlackjackRecord, StoreError> {
        Ok(BlackjackRecord {
            player_id: self.player_id as u64,
            guild_id: self.guild_id as u64,
            bet_amount: Chips(self.bet_amount as u64),
            initial_hand: HandSnapshot::new(
                HandSnapshot::split_cards(&self.initial_cards),
                self.initial_total as u32,
            ),
            dealer_card: self.dealer_card,
            decision: parse_decision(&self.decision)?,
            final_hand: HandSnapshot::new(
                HandSnapshot::split_cards(&self.final_cards),
                self.final_total as u32,
            ),
            result: parse_result(&self.result)?,
            timestamp: parse_timestamp(&self.timestamp)?,
        })
    }
}

impl DecisionStore for SqliteDecisionStore {
    fn save(&mut self, record: &BlackjackRecord) -> Result<(), StoreError> {
        // Снежинки < 2^63, приведение к i64 сохраняет биты.
        self.conn.execute(
            "INSERT INTO blackjack_records (
                player_id, guild_id, bet_amount, initial_cards, initial_total,
                dealer_card, decision, final_cards, final_total, result, timestamp
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                record.player_id as i64,
                record.guild_id as i64,
                record.bet_amount.0 as i64,
                record.initial_hand.joined_cards(),
                record.initial_hand.total,
                record.dealer_card,
                record.decision.as_str(),
                record.final_hand.joined_cards(),
                record.final_hand.total,
                record.result.as_str(),
                record.timestamp.to_rfc3339(),
            ],
        )?;
        debug!(
            player_id = record.player_id,
            decision = %record.decision,
            result = %record.result,
            "запись сохранена"
        );
        Ok(())
    }

    fn breakdown(&self) -> Result<Vec<BreakdownRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT initial_total, dealer_card, decision, COUNT(*) AS count
             FROM blackjack_records
             GROUP BY initial_total, dealer_card, decision
             ORDER BY initial_total, dealer_card, decision",
        )?;
        let raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        raw.into_iter()
            .map(|(total, dealer_card, decision, count)| {
                Ok(BreakdownRow {
                    initial_total: total as u32,
                    dealer_card,
                    decision: parse_decision(&decision)?,
                    count: count as u64,
                })
            })
            .collect()
    }

    fn outcomes(&self, total: u32, dealer_card: &str) -> Result<Vec<OutcomeRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT decision, result, COUNT(*) AS count
             FROM blackjack_records
             WHERE initial_total = ?1 AND dealer_card = ?2
             GROUP BY decision, result
             ORDER BY MIN(id)",
        )?;
        let raw = stmt
            .query_map(params![total, dealer_card], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        raw.into_iter()
            .map(|(decision, result, count)| {
                Ok(OutcomeRow {
                    decision: parse_decision(&decision)?,
                    result: parse_result(&result)?,
                    count: count as u64,
                })
            })
            .collect()
    }

    fn stats(&self) -> Result<Vec<StatsRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT initial_total, dealer_card, decision, result, COUNT(*) AS count
             FROM blackjack_records
             GROUP BY initial_total, dealer_card, decision, result
             ORDER BY initial_total, dealer_card, decision, result",
        )?;
        let raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        raw.into_iter()
            .map(|(total, dealer_card, decision, result, count)| {
                Ok(StatsRow {
                    initial_total: total as u32,
                    dealer_card,
                    decision: parse_decision(&decision)?,
                    result: parse_result(&result)?,
                    count: count as u64,
                })
            })
            .collect()
    }

    fn records(&self) -> Result<Vec<BlackjackRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT player_id, guild_id, bet_amount, initial_cards, initial_total,
                    dealer_card, decision, final_cards, final_total, result, timestamp
             FROM blackjack_records
             ORDER BY id",
        )?;
        let raw = stmt
            .query_map([], RawRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        raw.into_iter().map(RawRecord::into_record).collect()
    }
}
