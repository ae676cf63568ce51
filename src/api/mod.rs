//! Внешний API трекера.
//!
//! Здесь описываются:
//! - входящие события (commands.rs) – сообщения чата со снапшотами;
//! - запросы (queries.rs) – только чтение;
//! - DTO (dto.rs) – ответы адаптеру;
//! - ошибки (errors.rs) – то, что видит клиент.

pub mod commands;
pub mod dto;
pub mod errors;
pub mod queries;

pub use commands::*;
pub use dto::*;
pub use errors::*;
pub use queries::*;
