//! Настройки адаптера бота из переменных окружения.
//!
//! Ожидаемые переменные:
//!   - `DISCORD_TOKEN` – токен бота (обязателен);
//!   - `DATABASE_PATH` – путь к SQLite (по умолчанию `data/gambler_helper.db`);
//!   - `GUILD_WHITELIST` – id гильдий через запятую (опционально);
//!   - `UNBELIEVA_BOT_IDS` – id доверенных источников снапшотов через запятую (опционально);
//!   - `HAND_STALE_AFTER_SECS` – сколько секунд рука может жить без обновлений (опционально).

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::{GuildId, PlayerId};

pub const DEFAULT_DATABASE_PATH: &str = "data/gambler_helper.db";

/// Ошибки загрузки конфигурации. Фатальны при старте.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DISCORD_TOKEN обязателен")]
    MissingToken,

    #[error("Некорректный id в {var}: {value:?}")]
    InvalidId { var: &'static str, value: String },

    #[error("Некорректное число в {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub token: String,
    pub database_path: PathBuf,
    /// `None` – разрешены все гильдии.
    pub guild_whitelist: Option<HashSet<GuildId>>,
    /// `None` – снапшоты принимаются от любого автора.
    pub trusted_source_ids: Option<HashSet<PlayerId>>,
    pub stale_after: Option<Duration>,
}

impl Settings {
    /// Настройки с токеном и значениями по умолчанию.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            guild_whitelist: None,
            trusted_source_ids: None,
            stale_after: None,
        }
    }

    /// Загрузить из окружения процесса (с подхватом `.env`, если он есть).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Как `from_env`, но без `DISCORD_TOKEN` подставляется `fallback_token`.
    /// Остальные переменные читаются как обычно, их ошибки не глотаются.
    pub fn from_env_or_token(fallback_token: &str) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup_or_token(|key| std::env::var(key).ok(), fallback_token)
    }

    /// Загрузить через произвольный источник ключ -> значение.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = read_token(&lookup).ok_or(ConfigError::MissingToken)?;
        Self::optional_from_lookup(token, &lookup)
    }

    /// Загрузить через источник, токен необязателен.
    pub fn from_lookup_or_token<F>(lookup: F, fallback_token: &str) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = read_token(&lookup).unwrap_or_else(|| fallback_token.to_string());
        Self::optional_from_lookup(token, &lookup)
    }

    /// Всё, кроме токена.
    fn optional_from_lookup<F>(token: String, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("DATABASE_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let guild_whitelist = lookup("GUILD_WHITELIST")
            .map(|raw| parse_id_list("GUILD_WHITELIST", &raw))
            .transpose()?
            .filter(|set| !set.is_empty());

        let trusted_source_ids = lookup("UNBELIEVA_BOT_IDS")
            .map(|raw| parse_id_list("UNBELIEVA_BOT_IDS", &raw))
            .transpose()?
            .filter(|set| !set.is_empty());

        let stale_after = match lookup("HAND_STALE_AFTER_SECS") {
            Some(raw) if !raw.trim().is_empty() => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                    var: "HAND_STALE_AFTER_SECS",
                    value: raw.clone(),
                })?;
                Some(Duration::from_secs(secs))
            }
            _ => None,
        };

        Ok(Self {
            token,
            database_path,
            guild_whitelist,
            trusted_source_ids,
            stale_after,
        })
    }

    pub fn is_guild_allowed(&self, guild_id: Option<GuildId>) -> bool {
        match (&self.guild_whitelist, guild_id) {
            (Some(list), Some(id)) => list.contains(&id),
            // Личные сообщения и отсутствие списка не фильтруем.
            _ => true,
        }
    }

    pub fn is_trusted_source(&self, author_id: PlayerId) -> bool {
        self.trusted_source_ids
            .as_ref()
            .map(|ids| ids.contains(&author_id))
            .unwrap_or(true)
    }
}

fn read_token<F>(lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup("DISCORD_TOKEN").filter(|t| !t.trim().is_empty())
}

/// Список id через запятую; пустые элементы пропускаются.
fn parse_id_list(var: &'static str, raw: &str) -> Result<HashSet<u64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse().map_err(|_| ConfigError::InvalidId {
                var,
                value: s.to_string(),
            })
        })
        .collect()
}
