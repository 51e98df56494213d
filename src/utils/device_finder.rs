use crate::error::{Result, SwipeError};
use crate::swipe_error;
use evdev::{AbsoluteAxisCode, Device, PropType};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти подходящий сенсорный экран
    pub fn find_touch_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                SwipeError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        // Автопоиск сенсорного экрана
        Self::auto_find_touchscreen()
    }

    fn auto_find_touchscreen() -> Result<PathBuf> {
        info!("Начинаем автопоиск сенсорного экрана...");

        if let Ok(device) = Self::find_by_id() {
            info!("Найдено устройство по ID: {:?}", device);
            return Ok(device);
        }

        if let Ok(device) = Self::find_by_event_devices() {
            info!("Найдено устройство среди event устройств: {:?}", device);
            return Ok(device);
        }

        SwipeError::device_not_found(
            "Не удалось найти сенсорный экран. \
             Убедитесь, что пользователь добавлен в группу 'input'",
        )
    }

    fn find_by_id() -> Result<PathBuf> {
        let by_id_dir = Path::new("/dev/input/by-id");

        if !by_id_dir.exists() {
            debug!("Директория /dev/input/by-id не существует");
            return SwipeError::device_not_found("Директория by-id не найдена");
        }

        let entries = fs::read_dir(by_id_dir)
            .map_err(|e| swipe_error!(permission, "Нет доступа к /dev/input/by-id: {}", e))?;

        let mut candidates = Vec::new();

        for entry in entries {
            let path = entry?.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

            if !name.contains("event") || !Self::is_device_accessible(&path) {
                continue;
            }

            if Self::is_touchscreen(&path) {
                let priority = Self::name_priority(name);
                info!("Добавлен сенсорный экран: {} (приоритет: {})", name, priority);
                candidates.push((path, priority));
            }
        }

        // Сортируем по приоритету и возвращаем лучшее
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        match candidates.into_iter().next() {
            Some((device, _)) => Ok(device),
            None => SwipeError::device_not_found("Сенсорный экран не найден в by-id"),
        }
    }

    fn find_by_event_devices() -> Result<PathBuf> {
        let input_dir = Path::new("/dev/input");

        let entries = fs::read_dir(input_dir)
            .map_err(|e| swipe_error!(permission, "Нет доступа к /dev/input: {}", e))?;

        let mut event_devices = Vec::new();

        for entry in entries {
            let path = entry?.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

            if name.starts_with("event") {
                event_devices.push(path);
            }
        }

        // Сортируем устройства по номеру
        event_devices.sort();

        for device_path in event_devices {
            debug!("Проверяем устройство: {:?}", device_path);

            if Self::is_device_accessible(&device_path) && Self::is_touchscreen(&device_path) {
                return Ok(device_path);
            }
        }

        SwipeError::device_not_found("Не найден доступный сенсорный экран среди event устройств")
    }

    fn name_priority(name: &str) -> u32 {
        let name = name.to_lowercase();
        if name.contains("touchscreen") {
            100
        } else if name.contains("touch") {
            50
        } else {
            10
        }
    }

    /// Прямое устройство ввода с BTN_TOUCH и абсолютными координатами
    fn is_touchscreen(device_path: &Path) -> bool {
        let device = match Device::open(device_path) {
            Ok(device) => device,
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                return false;
            }
        };

        let device_name = device.name().unwrap_or("Unknown").to_lowercase();

        // Тачпады тоже сообщают BTN_TOUCH, но координаты у них относительны экрану
        if device_name.contains("touchpad") || device_name.contains("trackpad") {
            debug!("Исключаем тачпад: {:?} ({})", device_path, device_name);
            return false;
        }

        let direct = device.properties().contains(PropType::DIRECT);
        let has_touch = device
            .supported_keys()
            .map_or(false, |keys| keys.contains(evdev::KeyCode::BTN_TOUCH));
        let has_position = device.supported_absolute_axes().map_or(false, |axes| {
            (axes.contains(AbsoluteAxisCode::ABS_X) && axes.contains(AbsoluteAxisCode::ABS_Y))
                || (axes.contains(AbsoluteAxisCode::ABS_MT_POSITION_X)
                    && axes.contains(AbsoluteAxisCode::ABS_MT_POSITION_Y))
        });

        let matches = direct && has_touch && has_position;
        if matches {
            info!("Устройство {:?} подходит как сенсорный экран ({})", device_path, device_name);
        } else {
            debug!(
                "Устройство {:?} не подходит (direct: {}, touch: {}, position: {})",
                device_path, direct, has_touch, has_position
            );
        }

        matches
    }

    fn is_device_accessible(device_path: &Path) -> bool {
        match fs::File::open(device_path) {
            Ok(_) => true,
            Err(e) => {
                warn!("Устройство {:?} недоступно: {}", device_path, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_touch_device_with_specific_path() {
        // Тест с несуществующим путем
        let result = DeviceFinder::find_touch_device("/non/existent/path");
        assert!(matches!(result, Err(SwipeError::DeviceNotFound(_))));
    }

    #[test]
    fn test_name_priority() {
        assert_eq!(DeviceFinder::name_priority("usb-ELAN_Touchscreen-event-if00"), 100);
        assert_eq!(DeviceFinder::name_priority("i2c-Goodix_Touch-event"), 50);
        assert_eq!(DeviceFinder::name_priority("platform-event"), 10);
    }
}
