use core::fmt;

use serde::{Deserialize, Serialize};

/// Размер ставки. Обёртка над u64, чтобы не путать с очками руки.
///
/// Точность валюты не моделируется: бот пишет ставки целыми числами
/// с разделителями, которые мы просто выбрасываем.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Chips(pub u64);

impl Chips {
    pub const ZERO: Chips = Chips(0);

    pub fn new(amount: u64) -> Self {
        Chips(amount)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Оставить только цифры и распарсить. "1,500 💰" -> 1500.
    /// Пусто или переполнение -> ноль.
    pub fn from_digits(text: &str) -> Chips {
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        Chips(digits.parse().unwrap_or(0))
    }
}

impl fmt::Display for Chips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
