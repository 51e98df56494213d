use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwipeError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка uinput: {0}")]
    Uinput(#[from] uinput::Error),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Неизвестная клавиша: {0}")]
    InvalidKey(String),

    #[error("Ошибка канала: {0}")]
    Channel(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl SwipeError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(SwipeError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, SwipeError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! swipe_error {
    (channel, $($arg:tt)*) => {
        $crate::error::SwipeError::Channel(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::SwipeError::Permission(format!($($arg)*))
    };
    (invalid_key, $($arg:tt)*) => {
        $crate::error::SwipeError::InvalidKey(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::SwipeError::Internal(format!($($arg)*))
    };
}
