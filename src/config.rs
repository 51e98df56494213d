use crate::events::{KeyAction, SwipeDirection};
use crate::gesture::SwipeThresholds;
use crate::layout::ViewportSize;
use crate::services::KeyNames;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub swipe: SwipeThresholds,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub actions: Vec<SwipeAction>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Формат строк лога
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub device_path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            device_path: "auto".to_string(),
        }
    }
}

/// Переопределения вьюпорта; без них размер берётся из диапазона осей устройства
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ViewportConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Высота видимой области; меньше высоты окна, пока открыта клавиатура
    pub visual_height: Option<u32>,
    pub touch: Option<bool>,
}

impl ViewportConfig {
    pub fn size_or(&self, detected: Option<ViewportSize>) -> Option<ViewportSize> {
        match (self.width, self.height, detected) {
            (Some(width), Some(height), _) => Some(ViewportSize::new(width, height)),
            (width, height, Some(detected)) => Some(ViewportSize::new(
                width.unwrap_or(detected.width),
                height.unwrap_or(detected.height),
            )),
            _ => None,
        }
    }

    pub fn visual_height_or(&self, size: ViewportSize) -> u32 {
        self.visual_height.map_or(size.height, |visual| visual.min(size.height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Log,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Действие клавиатуры, привязанное к направлению свайпа
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SwipeAction {
    pub direction: SwipeDirection,
    pub key: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

impl SwipeAction {
    pub fn resolve(&self) -> crate::error::Result<KeyAction> {
        KeyNames::resolve_action(&self.key, &self.modifiers)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("SWIPE_").split("__"));

        Self::from_figment(figment)
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment
            .extract()
            .context("Неверная структура конфигурации")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        if self.input.device_path.is_empty() {
            anyhow::bail!("input.device_path не может быть пустым (используйте \"auto\")");
        }

        // Валидация порогов свайпа
        if self.swipe.min_horizontal_distance == 0 {
            anyhow::bail!("swipe.min_horizontal_distance должно быть больше 0");
        }

        if self.swipe.max_vertical_drift == 0 {
            anyhow::bail!("swipe.max_vertical_drift должно быть больше 0");
        }

        if [self.viewport.width, self.viewport.height, self.viewport.visual_height].contains(&Some(0)) {
            anyhow::bail!("Размеры вьюпорта должны быть больше 0");
        }

        // Валидация действий
        let mut directions = HashSet::new();
        for (i, action) in self.actions.iter().enumerate() {
            if !directions.insert(action.direction) {
                anyhow::bail!(
                    "Повторное действие для направления '{:?}' в действии #{}",
                    action.direction,
                    i + 1
                );
            }

            action
                .resolve()
                .with_context(|| format!("Неверное действие #{}", i + 1))?;
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn action_for(&self, direction: SwipeDirection) -> Option<&SwipeAction> {
        self.actions.iter().find(|action| action.direction == direction)
    }
}
