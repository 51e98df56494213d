use crate::error::Result;
use crate::events::{KeyAction, KeyCode, KeyState, VirtualKeyEvent};
use crate::swipe_error;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Виртуальная клавиатура для действий свайпа
pub struct VirtualDevice {
    device: Option<uinput::Device>,
    device_name: String,
    dry_run: bool,
    // Клавиши, для которых отправлено нажатие без отпускания
    held: BTreeSet<KeyCode>,
    sent: Vec<VirtualKeyEvent>,
}

impl VirtualDevice {
    pub fn new(device_name: &str, dry_run: bool) -> Result<Self> {
        info!("Инициализация VirtualDevice '{}' (dry_run: {})", device_name, dry_run);

        let device = if dry_run {
            None
        } else {
            Some(Self::create_virtual_device(device_name)?)
        };

        Ok(Self {
            device,
            device_name: device_name.to_string(),
            dry_run,
            held: BTreeSet::new(),
            sent: Vec::new(),
        })
    }

    fn create_virtual_device(device_name: &str) -> Result<uinput::Device> {
        info!("Создание виртуального устройства uinput '{}' для инъекции клавиш", device_name);

        let virtual_device = uinput::default()?
            .name(device_name)?
            .event(uinput::event::Keyboard::All)?
            .create()
            .map_err(|e| swipe_error!(internal, "Не удалось создать виртуальное устройство '{}': {}", device_name, e))?;

        info!("Виртуальное устройство '{}' создано успешно", device_name);
        Ok(virtual_device)
    }

    pub fn send_event(&mut self, event: VirtualKeyEvent) -> Result<()> {
        match event.state {
            KeyState::Pressed => self.held.insert(event.key_code),
            KeyState::Released => self.held.remove(&event.key_code),
        };

        if self.dry_run {
            info!("[DRY RUN] Виртуальное событие: {:?}", event);
            self.sent.push(event);
            return Ok(());
        }

        let device = self
            .device
            .as_mut()
            .ok_or_else(|| swipe_error!(internal, "Виртуальное устройство '{}' недоступно", self.device_name))?;

        let keycode = i32::from(event.key_code.value());

        // Отправляем событие клавиши
        device
            .write(1, keycode, event.state.value())
            .map_err(|e| swipe_error!(internal, "Не удалось отправить событие клавиши {}: {}", keycode, e))?;

        // Синхронизируем события
        device
            .write(0, 0, 0)
            .map_err(|e| swipe_error!(internal, "Не удалось синхронизировать события: {}", e))?;

        debug!("Виртуальное событие {} отправлено", event.key_code);
        Ok(())
    }

    /// Нажать и отпустить комбинацию клавиш
    pub fn send_action(&mut self, action: &KeyAction) -> Result<()> {
        for event in action.to_events() {
            self.send_event(event)?;
        }
        Ok(())
    }

    /// Отпустить всё, что осталось нажатым после неудачной отправки
    pub fn release_all_keys(&mut self) -> Result<()> {
        let held: Vec<KeyCode> = self.held.iter().rev().copied().collect();
        if !held.is_empty() {
            warn!("Отпускаем {} оставшихся нажатыми клавиш", held.len());
        }

        for key_code in held {
            self.send_event(VirtualKeyEvent::release(key_code))?;
        }
        Ok(())
    }

    pub fn held_keys(&self) -> usize {
        self.held.len()
    }

    /// События, отправленные в режиме сухого запуска
    #[cfg(test)]
    pub fn sent_events(&self) -> &[VirtualKeyEvent] {
        &self.sent
    }
}

impl Drop for VirtualDevice {
    fn drop(&mut self) {
        if self.dry_run {
            info!("[DRY RUN] '{}': записано виртуальных событий: {}", self.device_name, self.sent.len());
        } else {
            info!("Закрытие виртуального устройства '{}'", self.device_name);
        }
    }
}
