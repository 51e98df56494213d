use crate::config::Config;
use crate::error::{Result, SwipeError};
use crate::gesture::SwipeDetector;
use crate::layout::ViewportSize;
use crate::utils::DeviceFinder;
use evdev::{AbsoluteAxisCode, Device, EventType, InputEvent};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::r#trait::TouchListenerTrait;
use super::tracker::{RawTouchEvent, TouchTracker};

// errno для отключённого устройства
const ENODEV: i32 = 19;
const SYN_REPORT: u16 = 0;

/// Оси, с которых читаются координаты касания
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisCodes {
    x: AbsoluteAxisCode,
    y: AbsoluteAxisCode,
}

pub struct RealTouchListener {
    config: Arc<Config>,
    device: Device,
    axes: AxisCodes,
    surface: Option<ViewportSize>,
    tracker: TouchTracker,
}

impl RealTouchListener {
    pub fn new(config: Arc<Config>, detector: SwipeDetector) -> Result<Self> {
        info!("Инициализация RealTouchListener");

        let device_path = DeviceFinder::find_touch_device(&config.input.device_path)?;

        let device = Device::open(&device_path).map_err(|e| {
            SwipeError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        let axes = Self::detect_axes(&device)?;
        let surface = Self::detect_surface(&device, axes);

        info!("Устройство: {}", device.name().unwrap_or("Unknown"));
        info!("Физический путь: {:?}", device.physical_path());
        info!("Оси координат: {:?}, поверхность: {:?}", axes, surface);

        Ok(Self {
            config,
            device,
            axes,
            surface,
            tracker: TouchTracker::new(detector),
        })
    }

    /// Однокасательные ABS_X/ABS_Y предпочтительнее: это эмуляция первого контакта
    fn detect_axes(device: &Device) -> Result<AxisCodes> {
        let supported = device.supported_absolute_axes();
        let has = |axis: AbsoluteAxisCode| supported.map_or(false, |axes| axes.contains(axis));

        if has(AbsoluteAxisCode::ABS_X) && has(AbsoluteAxisCode::ABS_Y) {
            Ok(AxisCodes {
                x: AbsoluteAxisCode::ABS_X,
                y: AbsoluteAxisCode::ABS_Y,
            })
        } else if has(AbsoluteAxisCode::ABS_MT_POSITION_X) && has(AbsoluteAxisCode::ABS_MT_POSITION_Y) {
            Ok(AxisCodes {
                x: AbsoluteAxisCode::ABS_MT_POSITION_X,
                y: AbsoluteAxisCode::ABS_MT_POSITION_Y,
            })
        } else {
            SwipeError::device_not_found("Устройство не сообщает абсолютные координаты X/Y")
        }
    }

    fn detect_surface(device: &Device, axes: AxisCodes) -> Option<ViewportSize> {
        match device.get_abs_state() {
            Ok(state) => {
                let x = state[usize::from(axes.x.0)];
                let y = state[usize::from(axes.y.0)];
                let width = u32::try_from(x.maximum - x.minimum).ok()?;
                let height = u32::try_from(y.maximum - y.minimum).ok()?;
                (width > 0 && height > 0).then(|| ViewportSize::new(width, height))
            }
            Err(e) => {
                warn!("Не удалось прочитать диапазон осей: {}", e);
                None
            }
        }
    }

    fn to_raw(event: &InputEvent, axes: AxisCodes) -> Option<RawTouchEvent> {
        let event_type = event.event_type();
        let code = event.code();

        if event_type == EventType::KEY && code == evdev::KeyCode::BTN_TOUCH.code() {
            Some(RawTouchEvent::Contact(event.value() != 0))
        } else if event_type == EventType::ABSOLUTE && code == axes.x.0 {
            Some(RawTouchEvent::PositionX(event.value()))
        } else if event_type == EventType::ABSOLUTE && code == axes.y.0 {
            Some(RawTouchEvent::PositionY(event.value()))
        } else if event_type == EventType::SYNCHRONIZATION && code == SYN_REPORT {
            Some(RawTouchEvent::Report)
        } else {
            None
        }
    }

    async fn run_impl(self) -> Result<()> {
        let Self {
            config,
            device,
            axes,
            mut tracker,
            ..
        } = self;

        info!(
            "RealTouchListener запущен (порог {} / дрейф {})",
            config.swipe.min_horizontal_distance, config.swipe.max_vertical_drift
        );

        let mut stream = device.into_event_stream()?;

        loop {
            let event = match stream.next_event().await {
                Ok(event) => event,
                Err(e) if e.raw_os_error() == Some(ENODEV) => {
                    error!("Сенсорное устройство отключено: {}", e);
                    return Err(SwipeError::Io(e));
                }
                Err(e) => {
                    error!("Ошибка чтения событий: {}", e);
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    continue;
                }
            };

            if let Some(raw) = Self::to_raw(&event, axes) {
                if let Some(direction) = tracker.feed(raw) {
                    debug!("Распознан свайп: {}", direction);
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl TouchListenerTrait for RealTouchListener {
    fn surface(&self) -> Option<ViewportSize> {
        self.surface
    }

    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
