use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::events::{KeyAction, SwipeDirection, SwipeEvent};
use crate::layout::{LayoutHints, ViewportProfile, ViewportSize};
use crate::services::VirtualDevice;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Запись, которую получают внешние подписчики в формате `json`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum OutputRecord {
    SwipeLeft,
    SwipeRight,
    Viewport {
        size: ViewportSize,
        classes: Vec<&'static str>,
        profile: ViewportProfile,
        hints: LayoutHints,
    },
}

impl From<SwipeDirection> for OutputRecord {
    fn from(direction: SwipeDirection) -> Self {
        match direction {
            SwipeDirection::Left => OutputRecord::SwipeLeft,
            SwipeDirection::Right => OutputRecord::SwipeRight,
        }
    }
}

/// Рассылает распознанные свайпы: в лог или stdout и в действия клавиатуры
pub struct SwipeDispatcher {
    format: OutputFormat,
    actions: HashMap<SwipeDirection, KeyAction>,
    virtual_device: Option<Arc<Mutex<VirtualDevice>>>,
    dispatched: u64,
}

impl SwipeDispatcher {
    pub fn new(config: Arc<Config>, virtual_device: Option<Arc<Mutex<VirtualDevice>>>) -> Result<Self> {
        let mut actions = HashMap::with_capacity(config.actions.len());
        for action in &config.actions {
            let resolved = action.resolve()?;
            info!("Действие для {}: {}", action.direction, resolved);
            actions.insert(action.direction, resolved);
        }

        if !actions.is_empty() && virtual_device.is_none() {
            warn!("Действия настроены, но виртуальное устройство не создано - они будут пропущены");
        }

        Ok(Self {
            format: config.output.format,
            actions,
            virtual_device,
            dispatched: 0,
        })
    }

    #[cfg(test)]
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Сериализованная строка для формата `json`
    pub fn render(&self, record: &OutputRecord) -> Option<String> {
        if self.format != OutputFormat::Json {
            return None;
        }

        match serde_json::to_string(record) {
            Ok(line) => Some(line),
            Err(e) => {
                error!("Не удалось сериализовать событие {:?}: {}", record, e);
                None
            }
        }
    }

    fn emit(&self, record: &OutputRecord) {
        match self.render(record) {
            Some(line) => println!("{}", line),
            None => info!("Событие: {:?}", record),
        }
    }

    /// Опубликовать профиль вьюпорта (один раз при старте)
    pub fn announce_viewport(&self, size: ViewportSize, profile: ViewportProfile, hints: LayoutHints) {
        self.emit(&OutputRecord::Viewport {
            size,
            classes: profile.css_classes(),
            profile,
            hints,
        });
    }

    pub fn handle_swipe(&mut self, event: &SwipeEvent) -> Result<()> {
        self.dispatched += 1;
        info!("Свайп #{}: {}", self.dispatched, event);

        self.emit(&OutputRecord::from(event.direction));

        let (Some(action), Some(device)) = (self.actions.get(&event.direction), &self.virtual_device) else {
            return Ok(());
        };

        let mut device = device.lock();
        if let Err(e) = device.send_action(action) {
            error!("Не удалось отправить действие {} для {}: {}", action, event.direction, e);
            device.release_all_keys()?;
        }

        Ok(())
    }

    pub async fn run(mut self, mut events: mpsc::Receiver<SwipeEvent>) -> Result<()> {
        info!("SwipeDispatcher запущен");

        while let Some(event) = events.recv().await {
            if let Err(e) = self.handle_swipe(&event) {
                error!("Ошибка обработки свайпа: {}", e);
            }
        }

        info!("SwipeDispatcher завершён, обработано свайпов: {}", self.dispatched);
        Ok(())
    }
}
