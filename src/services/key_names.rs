use crate::error::Result;
use crate::events::{KeyAction, KeyCode, Modifiers};
use crate::swipe_error;

/// Преобразование имён клавиш в evdev коды
/// Отвечает за трансляцию строковых имён из `[[actions]]` в числовые коды evdev
pub struct KeyNames;

impl KeyNames {
    /// Получить evdev код клавиши по её имени
    pub fn translate(key_name: &str) -> Result<u16> {
        let normalized = key_name.to_lowercase();
        let code = match normalized.as_str() {
            // Буквенные клавиши
            "a" => 30, "b" => 48, "c" => 46, "d" => 32, "e" => 18, "f" => 33,
            "g" => 34, "h" => 35, "i" => 23, "j" => 36, "k" => 37, "l" => 38,
            "m" => 50, "n" => 49, "o" => 24, "p" => 25, "q" => 16, "r" => 19,
            "s" => 31, "t" => 20, "u" => 22, "v" => 47, "w" => 17, "x" => 45,
            "y" => 21, "z" => 44,

            // Цифровые клавиши (верхний ряд)
            "1" => 2, "2" => 3, "3" => 4, "4" => 5, "5" => 6,
            "6" => 7, "7" => 8, "8" => 9, "9" => 10, "0" => 11,

            // Специальные клавиши
            "space" => 57,       // KEY_SPACE
            "enter" => 28,       // KEY_ENTER
            "escape" => 1,       // KEY_ESC
            "backspace" => 14,   // KEY_BACKSPACE
            "tab" => 15,         // KEY_TAB
            "delete" => 111,     // KEY_DELETE
            "insert" => 110,     // KEY_INSERT

            // Навигация
            "up" => 103,         // KEY_UP
            "down" => 108,       // KEY_DOWN
            "left" => 105,       // KEY_LEFT
            "right" => 106,      // KEY_RIGHT
            "home" => 102,       // KEY_HOME
            "end" => 107,        // KEY_END
            "pageup" => 104,     // KEY_PAGEUP
            "pagedown" => 109,   // KEY_PAGEDOWN

            // Мультимедийные клавиши браузера
            "back" => 158,       // KEY_BACK
            "forward" => 159,    // KEY_FORWARD
            "menu" => 139,       // KEY_MENU

            // Функциональные клавиши
            "f1" => 59, "f2" => 60, "f3" => 61, "f4" => 62, "f5" => 63, "f6" => 64,
            "f7" => 65, "f8" => 66, "f9" => 67, "f10" => 68, "f11" => 87, "f12" => 88,

            _ => return Err(swipe_error!(invalid_key, "'{}'", key_name)),
        };

        Ok(code)
    }

    pub fn is_modifier(name: &str) -> bool {
        matches!(name.to_lowercase().as_str(), "ctrl" | "alt" | "shift" | "super")
    }

    /// Собрать действие из имени клавиши и имён модификаторов
    pub fn resolve_action(key: &str, modifiers: &[String]) -> Result<KeyAction> {
        if let Some(unknown) = modifiers.iter().find(|m| !Self::is_modifier(m)) {
            return Err(swipe_error!(invalid_key, "модификатор '{}'", unknown));
        }

        let key_code = KeyCode::new(Self::translate(key)?);
        Ok(KeyAction::new(key_code, Modifiers::from_vec(modifiers)))
    }
}
