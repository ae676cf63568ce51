//! Помощник для блэкджека стороннего бота-казино.
//!
//! Наблюдает за снапшотами стола в чате, восстанавливает решения игрока
//! (hit / stand / double), сохраняет завершённые раздачи и по накопленной
//! статистике подсказывает лучшее решение для ситуации
//! (сумма игрока, открытая карта дилера).
//!
//! Слои:
//! - `domain` – карты, ставки, записи раздач;
//! - `engine` – разбор снапшотов и трекер рук (ядро);
//! - `eval` – рекомендации и справочная стратегия;
//! - `infra` – хранилище, конфиг, логирование;
//! - `api` – входящие события, запросы, DTO;
//! - `service` – связка всего вышеперечисленного без транспорта.

pub mod api;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod service;

pub use service::GamblerHelper;
