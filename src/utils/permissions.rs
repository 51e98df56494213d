use crate::error::Result;
use crate::swipe_error;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{info, warn};

/// Проверить права доступа к необходимым ресурсам.
/// `/dev/uinput` нужен только при настроенных действиях клавиатуры.
pub fn check_permissions(needs_uinput: bool) -> Result<()> {
    info!("Проверка прав доступа...");

    check_input_devices_access()?;

    if needs_uinput {
        check_uinput_access()?;
    }

    check_not_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access() -> Result<()> {
    let input_dir = "/dev/input";

    if !Path::new(input_dir).exists() {
        return Err(swipe_error!(permission, "Директория {} не существует", input_dir));
    }

    match fs::read_dir(input_dir) {
        Ok(_) => {
            info!("Доступ к {} подтвержден", input_dir);
            Ok(())
        }
        Err(e) => Err(swipe_error!(
            permission,
            "Нет доступа к {}: {}. Добавьте пользователя в группу 'input'",
            input_dir,
            e
        )),
    }
}

fn check_uinput_access() -> Result<()> {
    let uinput_device = "/dev/uinput";

    if !Path::new(uinput_device).exists() {
        warn!("{} не существует, возможно модуль uinput не загружен", uinput_device);
        return Ok(());
    }

    let metadata = fs::metadata(uinput_device).map_err(|e| {
        swipe_error!(permission, "Не удалось проверить права доступа к {}: {}", uinput_device, e)
    })?;

    if !mode_allows_group_or_other(metadata.permissions().mode()) {
        return Err(swipe_error!(
            permission,
            "Нет прав доступа к {}. Добавьте пользователя в группу 'uinput' или 'input'",
            uinput_device
        ));
    }

    info!("Доступ к {} подтвержден", uinput_device);
    Ok(())
}

/// Обычно 660 или 666
fn mode_allows_group_or_other(mode: u32) -> bool {
    mode & 0o006 != 0 || mode & 0o060 != 0
}

fn check_not_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            warn!("⚠️  Приложение запущено от имени root!");
            warn!("   Рекомендуется добавить пользователя в группы 'input' и 'uinput'");
            warn!("   sudo usermod -a -G input,uinput $USER");
        }
        Ok(user) => {
            info!("Приложение запущено от имени пользователя: {}", user);
        }
        Err(_) => {
            warn!("Не удалось определить пользователя");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_check() {
        assert!(mode_allows_group_or_other(0o660));
        assert!(mode_allows_group_or_other(0o666));
        assert!(!mode_allows_group_or_other(0o600));
    }
}
