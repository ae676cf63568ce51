use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infra::persistence::StoreError;

/// Ошибки внешнего API (то, что видит адаптер / CLI).
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый JSON события).
    #[error("Некорректный запрос: {0}")]
    BadRequest(String),

    /// Хранилище недоступно или вернуло мусор.
    #[error("Ошибка хранилища: {0}")]
    Storage(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
