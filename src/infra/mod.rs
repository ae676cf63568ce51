//! Инфраструктурный слой вокруг трекера:
//! - хранилище решений (in-memory и SQLite);
//! - конфигурация из окружения;
//! - инициализация логирования.

pub mod config;
pub mod logging;
pub mod persistence;
pub mod sqlite;

pub use config::{ConfigError, Settings};
pub use logging::init_logging;
pub use persistence::*;
pub use sqlite::SqliteDecisionStore;
