use tracing_subscriber::{fmt, EnvFilter};

/// Поднять глобальный subscriber. Вызывается только из бинарей.
///
/// `RUST_LOG` имеет приоритет над `default_level`.
/// Повторный вызов ничего не ломает: ошибка установки игнорируется.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
