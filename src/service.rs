//! Связка трекера, хранилища и аналитики без привязки к транспорту.
//!
//! Поток: сообщение -> фильтры (гильдия, источник) -> разбор снапшота ->
//! `HandTracker` -> [финал] `DecisionStore::save` + рекомендация -> ответ.

use tracing::{debug, info};

use crate::api::{
    build_active_hand_view, build_breakdown_view, ApiError, InboundEvent, InboundMessage, Query,
    QueryResponse, Reply,
};
use crate::domain::hand::BlackjackRecord;
use crate::domain::PlayerId;
use crate::engine::{extract_observation, is_game_command, HandTracker, SnapshotOutcome};
use crate::eval::{basic_strategy_for, BlackjackAnalyzer};
use crate::infra::config::Settings;
use crate::infra::persistence::DecisionStore;

/// Помощник за игровым столом.
///
/// Владеет трекером и хранилищем; настройки задают фильтры адаптера.
/// События обрабатываются строго по одному, в порядке поступления.
pub struct GamblerHelper<S: DecisionStore> {
    settings: Settings,
    /// Собственный id бота – свои сообщения игнорируем.
    self_id: Option<PlayerId>,
    tracker: HandTracker,
    store: S,
}

impl<S: DecisionStore> GamblerHelper<S> {
    pub fn new(settings: Settings, store: S) -> Self {
        let tracker = match settings.stale_after {
            Some(d) => HandTracker::with_stale_after(d),
            None => HandTracker::new(),
        };
        Self {
            settings,
            self_id: None,
            tracker,
            store,
        }
    }

    pub fn with_self_id(mut self, self_id: PlayerId) -> Self {
        self.self_id = Some(self_id);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tracker(&self) -> &HandTracker {
        &self.tracker
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn analyzer(&self) -> BlackjackAnalyzer<'_, S> {
        BlackjackAnalyzer::new(&self.store)
    }

    /// Обработать любое входящее событие.
    pub fn handle_event(&mut self, event: &InboundEvent) -> Result<Vec<Reply>, ApiError> {
        match event {
            InboundEvent::Message(msg) => self.handle_message(msg),
            InboundEvent::Query { author_id, request } => {
                let text = match self.handle_query(request)? {
                    QueryResponse::Report(text) => text,
                    other => serde_json::to_string_pretty(&other)?,
                };
                Ok(vec![Reply {
                    target_id: *author_id,
                    text,
                }])
            }
        }
    }

    /// Обработать сообщение чата. Возвращает ответы, которые нужно отправить.
    pub fn handle_message(&mut self, msg: &InboundMessage) -> Result<Vec<Reply>, ApiError> {
        if self.self_id == Some(msg.author_id) {
            return Ok(Vec::new());
        }

        if !self.settings.is_guild_allowed(msg.guild_id) {
            debug!(guild_id = ?msg.guild_id, "гильдия не в белом списке");
            return Ok(Vec::new());
        }

        if !msg.author_is_bot && is_game_command(&msg.content) {
            info!(author_id = msg.author_id, "игрок запустил блэкджек");
        }

        self.tracker.on_text_decision(msg.author_id, &msg.content);

        let mut replies = Vec::new();
        if msg.embeds.is_empty() || !self.settings.is_trusted_source(msg.author_id) {
            return Ok(replies);
        }

        let player_id = msg.target_player_id();
        let guild_id = msg.guild_id.unwrap_or(0);

        for embed in &msg.embeds {
            let Some(obs) = extract_observation(embed) else {
                continue;
            };

            if let SnapshotOutcome::Finalized(record) =
                self.tracker.on_snapshot(player_id, guild_id, &obs)
            {
                self.store.save(&record)?;
                if let Some(text) = self.suggestion_for(&record)? {
                    replies.push(Reply {
                        target_id: Some(player_id),
                        text: format!("Gambler Helper suggestion for <@{player_id}>:\n{text}"),
                    });
                }
            }
        }

        Ok(replies)
    }

    /// Текст рекомендации после завершённой раздачи (+ базовая стратегия, если применима).
    fn suggestion_for(&self, record: &BlackjackRecord) -> Result<Option<String>, ApiError> {
        let initial = &record.initial_hand;
        let Some(rec) = self
            .analyzer()
            .recommendation(initial.total, &record.dealer_card)?
        else {
            return Ok(None);
        };

        let mut text = rec.to_string();
        if let Some(reference) = basic_strategy_for(&initial.cards, initial.total, &record.dealer_card)
        {
            text.push_str(&format!("\nBasic strategy: {}", reference.title()));
        }
        Ok(Some(text))
    }

    pub fn handle_query(&self, query: &Query) -> Result<QueryResponse, ApiError> {
        let analyzer = self.analyzer();
        let response = match query {
            Query::Stats => QueryResponse::Report(analyzer.breakdown_report()?),
            Query::Breakdown => {
                QueryResponse::Breakdown(build_breakdown_view(analyzer.aggregate_decisions()?))
            }
            Query::Recommendation { total, dealer_card } => {
                QueryResponse::Recommendation(analyzer.recommendation(*total, dealer_card)?)
            }
            Query::ActiveHand { player_id } => QueryResponse::ActiveHand(
                self.tracker.active_hand(*player_id).map(build_active_hand_view),
            ),
        };
        Ok(response)
    }

    /// Компактный отчёт по всем ситуациям (команда статистики).
    pub fn stats_report(&self) -> Result<String, ApiError> {
        Ok(self.analyzer().breakdown_report()?)
    }
}
