// src/engine/tracker.rs

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::chips::Chips;
use crate::domain::hand::{BlackjackRecord, Decision, HandSnapshot};
use crate::domain::{GuildId, PlayerId};
use crate::engine::decision::{infer_decision, is_game_command, parse_text_decision};
use crate::engine::extractor::Observation;

/// Незавершённая раздача одного игрока.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveHand {
    pub player_id: PlayerId,
    pub guild_id: GuildId,
    /// Ставка на момент первого снапшота.
    pub bet_amount: Chips,
    /// Стартовая рука (первое наблюдение).
    pub initial_hand: HandSnapshot,
    /// Открытая карта дилера.
    pub dealer_card: String,
    /// Сумма очков из последнего принятого снапшота.
    pub last_total: u32,
    pub started_at: DateTime<Utc>,
    /// Время последнего принятого снапшота. От него отсчитывается устаревание.
    pub last_seen: DateTime<Utc>,
    /// Последнее решение, которое игрок написал текстом (только для сверки).
    pub announced: Option<Decision>,
}

impl ActiveHand {
    fn open(player_id: PlayerId, guild_id: GuildId, obs: &Observation, now: DateTime<Utc>) -> Self {
        Self {
            player_id,
            guild_id,
            bet_amount: obs.bet_amount,
            initial_hand: obs.hand(),
            dealer_card: obs.dealer_card.clone(),
            last_total: obs.player_total,
            started_at: now,
            last_seen: now,
            announced: None,
        }
    }

    fn is_stale(&self, now: DateTime<Utc>, stale_after: Duration) -> bool {
        // Отрицательный возраст (часы ушли назад) не считаем устареванием.
        (now - self.last_seen)
            .to_std()
            .map(|age| age > stale_after)
            .unwrap_or(false)
    }
}

/// Что произошло с рукой после очередного снапшота.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// Первое наблюдение: открыта новая рука.
    Opened,
    /// Решение выведено, раздача продолжается.
    Progressed(Decision),
    /// Раздача завершена, рука удалена из трекера.
    Finalized(BlackjackRecord),
    /// Переход неоднозначен, состояние не менялось.
    Ignored,
}

/// Трекер раздач:
/// - не больше одной активной руки на игрока;
/// - по разнице снапшотов выводит решение (hit / stand / double);
/// - на финальном снапшоте отдаёт готовую запись и забывает руку.
///
/// Никакого глобального состояния: трекер создаётся и живёт там,
/// где его создали (адаптер бота, тест, CLI).
#[derive(Debug, Default)]
pub struct HandTracker {
    hands: HashMap<PlayerId, ActiveHand>,
    stale_after: Option<Duration>,
}

impl HandTracker {
    /// Трекер без таймаута: висящая рука живёт, пока её не закроет финал.
    pub fn new() -> Self {
        Self::default()
    }

    /// Руки без обновлений дольше `stale_after` выбрасываются при следующем снапшоте игрока.
    pub fn with_stale_after(stale_after: Duration) -> Self {
        Self {
            hands: HashMap::new(),
            stale_after: Some(stale_after),
        }
    }

    pub fn stale_after(&self) -> Option<Duration> {
        self.stale_after
    }

    pub fn active_hand(&self, player_id: PlayerId) -> Option<&ActiveHand> {
        self.hands.get(&player_id)
    }

    pub fn has_active_hand(&self, player_id: PlayerId) -> bool {
        self.hands.contains_key(&player_id)
    }

    pub fn active_count(&self) -> usize {
        self.hands.len()
    }

    /// Обработать снапшот с текущим временем.
    pub fn on_snapshot(
        &mut self,
        player_id: PlayerId,
        guild_id: GuildId,
        obs: &Observation,
    ) -> SnapshotOutcome {
        self.on_snapshot_at(player_id, guild_id, obs, Utc::now())
    }

    /// Обработать снапшот в заданный момент времени.
    ///
    /// Финальный снапшот для игрока без активной руки считается
    /// первым наблюдением: рука открывается, запись не создаётся.
    pub fn on_snapshot_at(
        &mut self,
        player_id: PlayerId,
        guild_id: GuildId,
        obs: &Observation,
        now: DateTime<Utc>,
    ) -> SnapshotOutcome {
        if let Some(stale_after) = self.stale_after {
            let stale = self
                .hands
                .get(&player_id)
                .map(|h| h.is_stale(now, stale_after))
                .unwrap_or(false);
            if stale {
                warn!(player_id, "рука устарела, начинаем заново");
                self.hands.remove(&player_id);
            }
        }

        if !self.hands.contains_key(&player_id) {
            let hand = ActiveHand::open(player_id, guild_id, obs, now);
            debug!(
                player_id,
                guild_id,
                total = hand.last_total,
                dealer = %hand.dealer_card,
                bet = %hand.bet_amount,
                "открыта новая рука"
            );
            self.hands.insert(player_id, hand);
            return SnapshotOutcome::Opened;
        }

        let Some(hand) = self.hands.get_mut(&player_id) else {
            return SnapshotOutcome::Ignored;
        };

        let Some(decision) = infer_decision(
            hand.last_total,
            hand.bet_amount,
            obs.player_total,
            obs.bet_amount,
        ) else {
            debug!(
                player_id,
                last_total = hand.last_total,
                new_total = obs.player_total,
                "решение не выводится, снапшот пропущен"
            );
            return SnapshotOutcome::Ignored;
        };

        let Some(result) = obs.result else {
            hand.last_total = obs.player_total;
            hand.last_seen = now;
            debug!(player_id, %decision, total = hand.last_total, "раздача продолжается");
            return SnapshotOutcome::Progressed(decision);
        };

        let Some(hand) = self.hands.remove(&player_id) else {
            return SnapshotOutcome::Ignored;
        };

        if let Some(announced) = hand.announced {
            if announced != decision {
                warn!(
                    player_id,
                    %announced,
                    inferred = %decision,
                    "текстовое решение расходится с выведенным, берём выведенное"
                );
            }
        }

        let record = BlackjackRecord {
            player_id,
            guild_id: hand.guild_id,
            bet_amount: hand.bet_amount,
            initial_hand: hand.initial_hand,
            dealer_card: hand.dealer_card,
            decision,
            final_hand: obs.hand(),
            result,
            timestamp: now,
        };

        info!(
            player_id,
            %decision,
            %result,
            initial_total = record.initial_hand.total,
            final_total = record.final_hand.total,
            "раздача завершена"
        );

        SnapshotOutcome::Finalized(record)
    }

    /// Текстовое решение игрока ("hit", "stand", "double down").
    ///
    /// Только подтверждающий сигнал: не меняет сумму и не завершает руку,
    /// запоминается для сверки при финале.
    pub fn on_text_decision(&mut self, player_id: PlayerId, raw: &str) -> Option<Decision> {
        let decision = parse_text_decision(raw)?;
        if let Some(hand) = self.hands.get_mut(&player_id) {
            hand.announced = Some(decision);
            debug!(player_id, %decision, "игрок объявил решение");
        }
        Some(decision)
    }

    /// Команда запуска игры (`.bj 100`, `.blackjack all`).
    pub fn is_game_command(raw: &str) -> bool {
        is_game_command(raw)
    }

    /// Выбросить все устаревшие руки. Без таймаута ничего не делает.
    pub fn prune_stale(&mut self, now: DateTime<Utc>) -> usize {
        let Some(stale_after) = self.stale_after else {
            return 0;
        };

        let before = self.hands.len();
        self.hands.retain(|_, h| !h.is_stale(now, stale_after));
        let removed = before - self.hands.len();
        if removed > 0 {
            info!(removed, "выброшены устаревшие руки");
        }
        removed
    }
}
