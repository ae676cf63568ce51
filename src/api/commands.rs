use serde::{Deserialize, Serialize};

use crate::domain::{GuildId, PlayerId};
use crate::engine::extractor::EmbedSnapshot;

use super::queries::Query;

/// Входящее событие верхнего уровня.
///
/// Адаптер транспорта (или CLI реплея) превращает события платформы
/// в эти структуры; ядро про платформу ничего не знает.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Сообщение в чате: текст и/или снапшоты стола.
    Message(InboundMessage),

    /// Запрос только на чтение (статистика, рекомендация).
    Query {
        /// Кто спросил; ответ адресуется ему.
        #[serde(default)]
        author_id: Option<PlayerId>,
        request: Query,
    },
}

/// Одно сообщение чата в нормализованном виде.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundMessage {
    pub author_id: PlayerId,
    /// Автор – бот (включая бота-крупье).
    #[serde(default)]
    pub author_is_bot: bool,
    /// Первый упомянутый пользователь: для снапшотов это игрок за столом.
    #[serde(default)]
    pub mentioned_id: Option<PlayerId>,
    /// `None` – личные сообщения.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub embeds: Vec<EmbedSnapshot>,
}

impl InboundMessage {
    /// Текстовое сообщение игрока.
    pub fn text(author_id: PlayerId, guild_id: Option<GuildId>, content: impl Into<String>) -> Self {
        Self {
            author_id,
            guild_id,
            content: content.into(),
            ..Self::default()
        }
    }

    /// Сообщение бота-крупье со снапшотом, адресованное игроку.
    pub fn snapshot(
        source_id: PlayerId,
        player_id: PlayerId,
        guild_id: Option<GuildId>,
        embed: EmbedSnapshot,
    ) -> Self {
        Self {
            author_id: source_id,
            author_is_bot: true,
            mentioned_id: Some(player_id),
            guild_id,
            embeds: vec![embed],
            ..Self::default()
        }
    }

    /// Чья это рука: упомянутый пользователь, иначе автор.
    pub fn target_player_id(&self) -> PlayerId {
        self.mentioned_id.unwrap_or(self.author_id)
    }
}
